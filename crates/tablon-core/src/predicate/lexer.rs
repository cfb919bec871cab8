//! Tokenizer for the predicate language

use super::fault::PredicateFault;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Str(String),
    Number(f64),
    True,
    False,
    None,
    And,
    Or,
    Not,
    Amp,
    Pipe,
    Tilde,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Assign,
    Minus,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Eof,
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            Self::Ident(name) => format!("identifier '{}'", name),
            Self::Str(_) => "string literal".to_string(),
            Self::Number(_) => "number".to_string(),
            Self::Eof => "end of expression".to_string(),
            other => format!("'{}'", other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::True => "True",
            Self::False => "False",
            Self::None => "None",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Amp => "&",
            Self::Pipe => "|",
            Self::Tilde => "~",
            Self::EqEq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Assign => "=",
            Self::Minus => "-",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Ident(_) | Self::Str(_) | Self::Number(_) | Self::Eof => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Character offset into the source
    pub offset: usize,
}

/// Split `source` into tokens, ending with a single `Eof`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, PredicateFault> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;

        if c.is_whitespace() || c == '\\' {
            // a trailing backslash is a line continuation
            i += 1;
            continue;
        }

        let raw_prefix = matches!(c, 'r' | 'R')
            && matches!(chars.get(i + 1), Some('\'') | Some('"'));
        if raw_prefix {
            let (text, next) = read_string(&chars, i + 1, true)?;
            tokens.push(Token { kind: TokenKind::Str(text), offset: start });
            i = next;
            continue;
        }

        if c == '\'' || c == '"' {
            let (text, next) = read_string(&chars, i, false)?;
            tokens.push(Token { kind: TokenKind::Str(text), offset: start });
            i = next;
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(|d| d.is_ascii_digit())) {
            let (value, next) = read_number(&chars, i)?;
            tokens.push(Token { kind: TokenKind::Number(value), offset: start });
            i = next;
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let kind = match word.as_str() {
                "True" => TokenKind::True,
                "False" => TokenKind::False,
                "None" => TokenKind::None,
                "and" => TokenKind::And,
                "or" => TokenKind::Or,
                "not" => TokenKind::Not,
                _ => TokenKind::Ident(word),
            };
            tokens.push(Token { kind, offset: start });
            continue;
        }

        let next = chars.get(i + 1).copied();
        let (kind, width) = match (c, next) {
            ('=', Some('=')) => (TokenKind::EqEq, 2),
            ('!', Some('=')) => (TokenKind::NotEq, 2),
            ('<', Some('=')) => (TokenKind::Le, 2),
            ('>', Some('=')) => (TokenKind::Ge, 2),
            ('=', _) => (TokenKind::Assign, 1),
            ('<', _) => (TokenKind::Lt, 1),
            ('>', _) => (TokenKind::Gt, 1),
            ('&', _) => (TokenKind::Amp, 1),
            ('|', _) => (TokenKind::Pipe, 1),
            ('~', _) => (TokenKind::Tilde, 1),
            ('-', _) => (TokenKind::Minus, 1),
            ('(', _) => (TokenKind::LParen, 1),
            (')', _) => (TokenKind::RParen, 1),
            ('[', _) => (TokenKind::LBracket, 1),
            (']', _) => (TokenKind::RBracket, 1),
            (',', _) => (TokenKind::Comma, 1),
            ('.', _) => (TokenKind::Dot, 1),
            _ => {
                return Err(PredicateFault::syntax(
                    format!("unexpected character '{}'", c),
                    start,
                ));
            }
        };
        tokens.push(Token { kind, offset: start });
        i += width;
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        offset: chars.len(),
    });
    Ok(tokens)
}

fn read_string(chars: &[char], start: usize, raw: bool) -> Result<(String, usize), PredicateFault> {
    let quote = chars[start];
    let mut text = String::new();
    let mut i = start + 1;

    while i < chars.len() {
        let c = chars[i];
        if c == quote {
            return Ok((text, i + 1));
        }
        if c == '\\' && i + 1 < chars.len() {
            let escaped = chars[i + 1];
            if raw {
                text.push('\\');
                text.push(escaped);
            } else {
                match escaped {
                    'n' => text.push('\n'),
                    't' => text.push('\t'),
                    '\\' | '\'' | '"' => text.push(escaped),
                    other => {
                        text.push('\\');
                        text.push(other);
                    }
                }
            }
            i += 2;
            continue;
        }
        text.push(c);
        i += 1;
    }

    Err(PredicateFault::syntax("unterminated string literal", start))
}

fn read_number(chars: &[char], start: usize) -> Result<(f64, usize), PredicateFault> {
    let mut i = start;
    let mut seen_dot = false;
    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() || c == '_' {
            i += 1;
        } else if c == '.' && !seen_dot && chars.get(i + 1).is_none_or(|d| d.is_ascii_digit()) {
            seen_dot = true;
            i += 1;
        } else if matches!(c, 'e' | 'E')
            && chars
                .get(i + 1)
                .is_some_and(|d| d.is_ascii_digit() || *d == '-' || *d == '+')
        {
            i += 2;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            break;
        } else {
            break;
        }
    }

    let literal: String = chars[start..i].iter().filter(|c| **c != '_').collect();
    literal
        .parse::<f64>()
        .map(|value| (value, i))
        .map_err(|_| PredicateFault::syntax(format!("invalid number '{}'", literal), start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_mask() {
        assert_eq!(
            kinds("df[df['MARCA'] == \"TOYOTA\"]"),
            vec![
                TokenKind::Ident("df".into()),
                TokenKind::LBracket,
                TokenKind::Ident("df".into()),
                TokenKind::LBracket,
                TokenKind::Str("MARCA".into()),
                TokenKind::RBracket,
                TokenKind::EqEq,
                TokenKind::Str("TOYOTA".into()),
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_unicode_identifiers_and_numbers() {
        assert_eq!(
            kinds("df.AÑO_MODELO >= 2020.5"),
            vec![
                TokenKind::Ident("df".into()),
                TokenKind::Dot,
                TokenKind::Ident("AÑO_MODELO".into()),
                TokenKind::Ge,
                TokenKind::Number(2020.5),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_keywords_and_raw_strings() {
        assert_eq!(
            kinds(r"not True and r'\d+'"),
            vec![
                TokenKind::Not,
                TokenKind::True,
                TokenKind::And,
                TokenKind::Str(r"\d+".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        assert_eq!(
            kinds(r"'O\'HARA'"),
            vec![TokenKind::Str("O'HARA".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_string_is_syntax_fault() {
        let err = tokenize("df['MARCA").unwrap_err();
        assert_eq!(err, PredicateFault::syntax("unterminated string literal", 3));
    }

    #[test]
    fn test_unexpected_character() {
        assert!(matches!(
            tokenize("df @ 1"),
            Err(PredicateFault::Syntax { position: 3, .. })
        ));
    }
}
