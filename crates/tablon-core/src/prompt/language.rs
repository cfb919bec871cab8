//! Fixed instruction text per language

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language of the instruction surrounding the user's request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptLanguage {
    #[default]
    Es,
    En,
}

impl fmt::Display for PromptLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Es => write!(f, "es"),
            Self::En => write!(f, "en"),
        }
    }
}

impl FromStr for PromptLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "es" | "spanish" | "español" => Ok(Self::Es),
            "en" | "english" => Ok(Self::En),
            _ => Err(format!("Unknown prompt language: {}", s)),
        }
    }
}

/// Every sentence the compiler emits, in one language
pub(super) struct Phrases {
    pub role: &'static str,
    pub columns_header: &'static str,
    pub rules_header: &'static str,
    /// `{column}` is the temporal column
    pub date_rule: &'static str,
    /// `{columns}` lists the upper-case columns
    pub uppercase_rule: &'static str,
    /// `{column}` is the forbidden column, `{target}` its replacement
    pub redirect_rule: &'static str,
    pub names_rule: &'static str,
    pub vocabulary_header: &'static str,
    pub grammar_header: &'static str,
    pub grammar: &'static str,
    pub examples_header: &'static str,
    pub request_header: &'static str,
    pub empty_request: &'static str,
    pub output_contract: &'static str,
}

const SPANISH: Phrases = Phrases {
    role: "Eres un asistente especializado en análisis de datos con Python y Pandas. \
           El usuario tiene un DataFrame llamado 'df' y quiere filtrarlo según sus condiciones.",
    columns_header: "Columnas del DataFrame y su tipo de dato:",
    rules_header: "Reglas:",
    date_rule: "Cuando el usuario pida \"fecha\", \"año\" o \"gestión\", usa solo la columna \
                \"{column}\" con el accesor .dt (por ejemplo df['{column}'].dt.year); nunca compares fechas como texto.",
    uppercase_rule: "En las columnas {columns} los valores están en mayúsculas: convierte el valor del usuario a mayúsculas.",
    redirect_rule: "Cuando el usuario pida el importador, usa solamente la columna \"{target}\"; nunca uses \"{column}\".",
    names_rule: "Todos los nombres de columna están en mayúsculas; los valores no necesariamente.",
    vocabulary_header: "Los únicos valores posibles de estas columnas son:",
    grammar_header: "Solo se acepta una expresión con esta forma:",
    grammar: "- df[condición] o df.loc[condición]\n\
              - columnas como df['COLUMNA']\n\
              - comparaciones ==, !=, <, <=, >, >= combinadas con &, | y ~, cada una entre paréntesis\n\
              - .isin([...]), .between(a, b), .isna(), .notna()\n\
              - .str.contains('texto', case=False), .str.startswith('x'), .str.endswith('x'), .str.upper(), .str.lower()\n\
              - .dt.year, .dt.month, .dt.day, .dt.quarter, .dt.dayofweek sobre la columna de fecha\n\
              - fechas como '2023-01-31' o pd.to_datetime('2023-01-31')",
    examples_header: "Ejemplos:",
    request_header: "Genera el filtro de 'df' para:",
    empty_request: "(sin condiciones)",
    output_contract: "Devuelve solo una expresión de una línea con la forma df[...], \
                      sin asignaciones, sin explicación y sin ningún comentario.",
};

const ENGLISH: Phrases = Phrases {
    role: "You are an assistant specialised in data analysis with Python and Pandas. \
           The user has a DataFrame named 'df' and wants to filter it by their conditions.",
    columns_header: "DataFrame columns and their data type:",
    rules_header: "Rules:",
    date_rule: "When the user asks for a \"date\", \"year\" or \"period\", use only the \"{column}\" \
                column through the .dt accessor (for example df['{column}'].dt.year); never compare dates as text.",
    uppercase_rule: "Values in the columns {columns} are upper case: convert the user's value to upper case.",
    redirect_rule: "When the user asks for the importer, use only the \"{target}\" column; never use \"{column}\".",
    names_rule: "All column names are upper case; their values are not necessarily.",
    vocabulary_header: "The only possible values of these columns are:",
    grammar_header: "Only an expression of this shape is accepted:",
    grammar: "- df[condition] or df.loc[condition]\n\
              - columns as df['COLUMN']\n\
              - comparisons ==, !=, <, <=, >, >= combined with &, | and ~, each in parentheses\n\
              - .isin([...]), .between(a, b), .isna(), .notna()\n\
              - .str.contains('text', case=False), .str.startswith('x'), .str.endswith('x'), .str.upper(), .str.lower()\n\
              - .dt.year, .dt.month, .dt.day, .dt.quarter, .dt.dayofweek on the date column\n\
              - dates as '2023-01-31' or pd.to_datetime('2023-01-31')",
    examples_header: "Examples:",
    request_header: "Write the filter of 'df' for:",
    empty_request: "(no conditions)",
    output_contract: "Return only a single-line expression of the form df[...], \
                      with no assignment, no explanation and no comments at all.",
};

impl PromptLanguage {
    pub(super) fn phrases(self) -> &'static Phrases {
        match self {
            Self::Es => &SPANISH,
            Self::En => &ENGLISH,
        }
    }

    /// Worked examples as (request, expression) pairs
    pub(super) fn examples(self) -> [(&'static str, &'static str); 2] {
        match self {
            Self::Es => [
                (
                    "importaciones de toyota del 2023",
                    "df[(df['MARCA'] == 'TOYOTA') & (df['FECHA'].dt.year == 2023)]",
                ),
                (
                    "mercado gris de minoristas, modelos que contengan hilux",
                    "df[(df['MERCADO'] == 'Gris') & (df['TIPO_COMERCIO'] == 'Minorista') & (df['MODELO'].str.contains('HILUX', case=False))]",
                ),
            ],
            Self::En => [
                (
                    "toyota imports from 2023",
                    "df[(df['MARCA'] == 'TOYOTA') & (df['FECHA'].dt.year == 2023)]",
                ),
                (
                    "grey market retailers, models containing hilux",
                    "df[(df['MERCADO'] == 'Gris') & (df['TIPO_COMERCIO'] == 'Minorista') & (df['MODELO'].str.contains('HILUX', case=False))]",
                ),
            ],
        }
    }
}
