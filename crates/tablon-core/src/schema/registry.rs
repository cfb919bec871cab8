//! The registry itself and the built-in vehicle import schema

use super::types::{CasingRule, ColumnSpec, SemanticType};
use crate::error::{TablonError, TablonResult};
use std::collections::HashMap;

/// Ordered, immutable set of column specifications.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    columns: Vec<ColumnSpec>,
    index: HashMap<String, usize>,
    temporal: usize,
}

impl SchemaRegistry {
    /// Build a registry, validating the entries.
    ///
    /// Rejects duplicate or non-uppercase names, vocabularies on
    /// non-categorical columns, categorical columns without a vocabulary,
    /// redirects to unknown columns, and anything other than exactly one
    /// date column.
    pub fn from_entries(columns: Vec<ColumnSpec>) -> TablonResult<Self> {
        let mut index = HashMap::with_capacity(columns.len());
        let mut temporal = Vec::new();

        for (position, spec) in columns.iter().enumerate() {
            if spec.name.is_empty() || spec.name != spec.name.to_uppercase() {
                return Err(TablonError::config(format!(
                    "Column name '{}' is not in canonical upper-case form",
                    spec.name
                )));
            }
            if index.insert(spec.name.clone(), position).is_some() {
                return Err(TablonError::config(format!(
                    "Column '{}' is declared twice",
                    spec.name
                )));
            }
            match (spec.semantic_type, &spec.allowed_values) {
                (SemanticType::Categorical, None) => {
                    return Err(TablonError::config(format!(
                        "Categorical column '{}' has no vocabulary",
                        spec.name
                    )));
                }
                (SemanticType::Categorical, Some(_)) | (_, None) => {}
                (other, Some(_)) => {
                    return Err(TablonError::config(format!(
                        "Column '{}' is {} but declares a vocabulary",
                        spec.name, other
                    )));
                }
            }
            if spec.semantic_type == SemanticType::Date {
                temporal.push(position);
            }
        }

        for spec in &columns {
            if let Some(target) = &spec.redirect {
                if !index.contains_key(target) {
                    return Err(TablonError::config(format!(
                        "Column '{}' redirects to unknown column '{}'",
                        spec.name, target
                    )));
                }
            }
        }

        let temporal = match temporal.as_slice() {
            [single] => *single,
            [] => return Err(TablonError::config("Schema has no date column")),
            _ => return Err(TablonError::config("Schema has more than one date column")),
        };

        Ok(Self {
            columns,
            index,
            temporal,
        })
    }

    /// Schema of the vehicle import table (`tablon.parquet`).
    pub fn vehicle_imports() -> Self {
        use SemanticType::{Integer, Number};

        let columns = vec![
            ColumnSpec::text("FRV"),
            ColumnSpec::date("FECHA").with_description("import date"),
            ColumnSpec::text("NIT"),
            ColumnSpec::text("REGISTRO"),
            ColumnSpec::text("CHASIS"),
            ColumnSpec::text("MOTOR"),
            ColumnSpec::text("PARTIDA"),
            ColumnSpec::new("AÑO_MODELO", Number).with_description("model year"),
            ColumnSpec::text("MARCA")
                .with_casing(CasingRule::UppercaseInput)
                .with_description("vehicle brand"),
            ColumnSpec::text("CLASE"),
            ColumnSpec::text("MODELO"),
            ColumnSpec::text("VERSION"),
            ColumnSpec::new("CILINDRADA", Number),
            ColumnSpec::text("PAIS_ORIGEN"),
            ColumnSpec::new("NRO_PUERTAS", Number),
            ColumnSpec::text("TRACCION"),
            ColumnSpec::text("CAPACIDAD_CARGA"),
            ColumnSpec::text("NRO_RUEDAS"),
            ColumnSpec::text("COMBUSTIBLE"),
            ColumnSpec::new("AÑO_FABRICACION", Number).with_description("manufacturing year"),
            ColumnSpec::text("DUI"),
            ColumnSpec::text("FOB"),
            ColumnSpec::text("PROVEEDOR"),
            ColumnSpec::text("DOCUMENTO"),
            ColumnSpec::text("IMPORTADOR").redirected_to("IMPORTADOR_AGRUPADO"),
            ColumnSpec::text("LEVANTE"),
            ColumnSpec::text("CANAL"),
            ColumnSpec::text("FOB_2"),
            ColumnSpec::text("FOB_3"),
            ColumnSpec::text("ÚLTIMO_ENVÍO_RUAT"),
            ColumnSpec::text("CLASE_SELECT"),
            ColumnSpec::new("GAP_IMP", Number),
            ColumnSpec::categorical("MARCA_SELECT", &["YES", "NO"]),
            ColumnSpec::categorical("TIPO_SELECT", &["YES", "NO"]),
            ColumnSpec::new("CLUST_IMPORTADOR", Integer),
            ColumnSpec::text("IMPORTADOR_AGRUPADO").with_description("grouped importer"),
            ColumnSpec::categorical("MERCADO", &["Gris", "Formal"]),
            ColumnSpec::categorical("TIPO_COMERCIO", &["Minorista", "Distribuidor"]),
            ColumnSpec::categorical("COMPETENCIA", &["COMPETENCIA", "OTRO"]),
            ColumnSpec::text("SUBSEGMENTO").with_casing(CasingRule::UppercaseInput),
        ];

        Self::assemble(columns)
    }

    /// Index `columns` without validating them. Callers vouch for the table.
    fn assemble(columns: Vec<ColumnSpec>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(position, spec)| (spec.name.clone(), position))
            .collect();
        let temporal = columns
            .iter()
            .position(|spec| spec.semantic_type == SemanticType::Date)
            .unwrap_or_default();
        Self {
            columns,
            index,
            temporal,
        }
    }

    /// All columns in declaration order
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up a column; `name` is upper-cased first.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.index
            .get(&name.trim().to_uppercase())
            .map(|&position| &self.columns[position])
    }

    /// Exact-name lookup, no case folding
    pub fn column_exact(&self, name: &str) -> Option<&ColumnSpec> {
        self.index.get(name).map(|&position| &self.columns[position])
    }

    /// The single date column
    pub fn temporal_column(&self) -> &ColumnSpec {
        &self.columns[self.temporal]
    }

    pub fn categorical_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns
            .iter()
            .filter(|spec| spec.semantic_type == SemanticType::Categorical)
    }

    pub fn uppercase_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|spec| spec.uppercases_input())
    }

    /// The column to use instead of `name`, if `name` is off limits in any
    /// casing.
    pub fn redirect_for(&self, name: &str) -> Option<&str> {
        self.column(name).and_then(|spec| spec.redirect.as_deref())
    }
}
