use std::{collections::BTreeSet, path::Path};

use crate::{
    foundation::error::{ScorecastError, ScorecastResult},
    timeline::store::{ParamSet, TIMESTAMP_COLUMN},
};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Values supplied once for the whole run.
///
/// They fill placeholders that the active event does not set; event values win on conflict.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlobalParams(ParamSet);

impl GlobalParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `name=value` assignments. The first `=` splits, so values may contain `=`.
    pub fn parse_assignments<I, S>(assignments: I) -> ScorecastResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self::new();
        for a in assignments {
            let a = a.as_ref();
            let Some((name, value)) = a.split_once('=') else {
                return Err(ScorecastError::config(format!(
                    "global value '{a}' should use the format name=value"
                )));
            };
            if name.is_empty() {
                return Err(ScorecastError::config(format!(
                    "global value '{a}' has an empty name"
                )));
            }
            out.insert(name, value);
        }
        Ok(out)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for GlobalParams {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A markup document with `{{name}}` placeholders.
#[derive(Clone, Debug)]
pub struct Template {
    text: String,
}

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn from_path(path: &Path) -> ScorecastResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScorecastError::template_read(format!(
                "cannot read template '{}': {e}",
                path.display()
            ))
        })?;
        Ok(Self::new(text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Distinct placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        let mut rest = self.text.as_str();
        while let Some(start) = rest.find(OPEN) {
            let after = &rest[start + OPEN.len()..];
            let Some(end) = after.find(CLOSE) else {
                break;
            };
            let name = &after[..end];
            if let Some(inner) = name.rfind(OPEN) {
                rest = &after[inner..];
                continue;
            }
            if seen.insert(name) {
                out.push(name);
            }
            rest = &after[end + CLOSE.len()..];
        }
        out
    }

    pub fn fill(&self, globals: &GlobalParams, event_params: &ParamSet) -> String {
        fill(&self.text, globals, event_params)
    }
}

/// Substitute `{{key}}` tokens in a single left-to-right pass.
///
/// Lookup order is the event's own params, then `globals`. The `timestamp` key is never
/// substituted and unknown tokens are left as-is. Substituted values are not re-scanned.
/// A token runs from the innermost `{{` to the first following `}}`, so key names cannot
/// themselves end in `}`.
pub fn fill(template_text: &str, globals: &GlobalParams, event_params: &ParamSet) -> String {
    let mut out = String::with_capacity(template_text.len());
    let mut rest = template_text;
    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];
        let Some(end) = after.find(CLOSE) else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        // `{{a{{b}}`: only the innermost opener can start a token ending at this `}}`.
        if let Some(inner) = name.rfind(OPEN) {
            out.push_str(&rest[start..start + OPEN.len() + inner]);
            rest = &after[inner..];
            continue;
        }

        match lookup(name, globals, event_params) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[start..start + OPEN.len() + end + CLOSE.len()]),
        }
        rest = &after[end + CLOSE.len()..];
    }
    out.push_str(rest);
    out
}

fn lookup<'a>(name: &str, globals: &'a GlobalParams, event_params: &'a ParamSet) -> Option<&'a str> {
    if name == TIMESTAMP_COLUMN {
        return None;
    }
    event_params
        .get(name)
        .map(String::as_str)
        .or_else(|| globals.get(name))
}

#[cfg(test)]
#[path = "../../tests/unit/template/engine.rs"]
mod tests;
