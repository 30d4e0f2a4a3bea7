/// parse a settings document built of sections: a title line followed by "key: value1, value2"
/// lines. Comment lines starting with //, #, % or ; are skipped. The result is HashMap<section,
/// HashMap<key, Option<Vec<Value>>>>; keys listed in a template but missing in the document come
/// out as None.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, recognize},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair, separated_pair},
};
use std::collections::HashMap;
use std::fmt::Display;

pub type SectionMap = HashMap<String, Option<Vec<Value>>>;
pub type DocumentMap = HashMap<String, SectionMap>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    /// integers are accepted where a float is expected
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_usize(&self) -> Option<usize> {
        match self {
            Value::Integer(i) if *i >= 0 => Some(*i as usize),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

/// identifier: letter or underscore, then letters, digits, underscores
fn parse_identifier(input: &str) -> IResult<&str, String> {
    let mut parser = map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
        String::from,
    );
    parser.parse(input)
}

fn parse_value(input: &str) -> IResult<&str, Value> {
    let mut parser = map(
        take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\r' | '\n' | ';')),
        |s: &str| {
            if let Ok(val) = s.parse::<i64>() {
                Value::Integer(val)
            } else if let Ok(val) = s.parse::<f64>() {
                Value::Float(val)
            } else if let Ok(val) = s.parse::<bool>() {
                Value::Boolean(val)
            } else {
                Value::String(s.to_string())
            }
        },
    );
    parser.parse(input)
}

fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let mut parser = separated_list1(delimited(space0, tag(","), space0), parse_value);
    parser.parse(input)
}

/// "key: v1, v2" followed by any whitespace
fn parse_key_values(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let mut parser = separated_pair(
        parse_identifier,
        delimited(space0, tag(":"), space0),
        parse_value_list,
    );
    let (input, result) = parser.parse(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, result))
}

fn parse_section(input: &str) -> IResult<&str, (String, Vec<(String, Vec<Value>)>)> {
    let (input, title) = parse_identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, pairs) = many1(parse_key_values).parse(input)?;
    Ok((input, (title, pairs)))
}

fn filter_comments(input: &str) -> String {
    input
        .lines()
        .map(str::trim)
        .filter(|line| {
            !(line.is_empty()
                || line.starts_with("//")
                || line.starts_with('#')
                || line.starts_with('%')
                || line.starts_with(';'))
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

fn parse_sections(input: &str) -> IResult<&str, DocumentMap> {
    let (input, _) = multispace0(input)?;
    let (input, sections) = many1(parse_section).parse(input)?;
    let mut document = DocumentMap::new();
    for (title, pairs) in sections {
        let section = document.entry(title).or_default();
        for (key, values) in pairs {
            section.insert(key, Some(values));
        }
    }
    Ok((input, document))
}

/// Parse the whole document; every section/key of `template` is guaranteed to be present in the
/// result
pub fn parse_document_as(
    input: &str,
    template: Option<&DocumentMap>,
) -> Result<DocumentMap, String> {
    let filtered = filter_comments(input);
    let (remaining, mut document) =
        parse_sections(&filtered).map_err(|e| format!("Parsing error: {:?}", e))?;
    if !remaining.trim().is_empty() {
        return Err(format!(
            "Failed to parse entire document. Remaining: '{}'",
            remaining
        ));
    }
    if let Some(template) = template {
        for (title, keys) in template {
            let section = document.entry(title.clone()).or_default();
            for key in keys.keys() {
                section.entry(key.clone()).or_insert(None);
            }
        }
    }
    Ok(document)
}
