use crate::{Error, Result};

/// Parsed field annotation.
///
/// Syntax: `name[,flag]*[,key:value]*`. The first token is the column name,
/// the following ones are either flags or `key:value` pairs (split at the
/// first colon). Tokens that are not recognized flags are kept, in order, as
/// a free-form column property appended to the column definition.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    pub primary: bool,
    pub foreign: bool,
    pub unique: bool,
    pub json: bool,
    pub autoinc: bool,
    pub created: bool,
    pub updated: bool,
    pub default: Option<String>,
    pub table: Option<String>,
    pub column_type: Option<String>,
    pub refresh: Option<String>,
    pub extra: Option<String>,
}

pub fn parse_tag(tag: &str) -> Result<Tag> {
    let malformed = |reason: String| Error::MalformedTag {
        tag: tag.to_owned(),
        reason,
    };
    let mut tokens = tag.split(',').map(str::trim);
    let name = tokens.next().unwrap_or_default();
    if name.is_empty() {
        return Err(malformed("the column name is empty".into()));
    }
    if name.contains(':') {
        return Err(malformed(format!(
            "the first token `{name}` must be the column name"
        )));
    }
    let mut result = Tag {
        name: name.to_owned(),
        ..Default::default()
    };
    let mut extra = Vec::new();
    for token in tokens.filter(|v| !v.is_empty()) {
        if let Some((key, value)) = token.split_once(':') {
            let value = value.trim();
            let target = match key.trim() {
                "default" => &mut result.default,
                "table" => &mut result.table,
                "type" => &mut result.column_type,
                "refresh" => &mut result.refresh,
                other => {
                    return Err(malformed(format!("unknown key `{other}`")));
                }
            };
            if value.is_empty() {
                return Err(malformed(format!("the key `{}` has no value", key.trim())));
            }
            *target = Some(value.to_owned());
            continue;
        }
        match token {
            "primary" => result.primary = true,
            "foreign" => result.foreign = true,
            "unique" => result.unique = true,
            "json" => result.json = true,
            "autoinc" => result.autoinc = true,
            "created" => result.created = true,
            "updated" => result.updated = true,
            v => extra.push(v),
        }
    }
    if !extra.is_empty() {
        result.extra = Some(extra.join(" "));
    }
    Ok(result)
}
