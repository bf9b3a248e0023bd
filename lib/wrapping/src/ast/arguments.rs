use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
};

use graphql_parser::query::Value as ParserValue;
use serde::{Deserialize, Serialize};

use super::value::Value;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Default)]
pub struct ArgumentsMap {
    arguments_map: BTreeMap<String, Value>,
}

impl From<&Vec<(String, ParserValue<'_, String>)>> for ArgumentsMap {
    fn from(args: &Vec<(String, ParserValue<'_, String>)>) -> Self {
        let mut arguments_map = BTreeMap::new();
        for (key, value) in args {
            let value = Value::from(value);
            arguments_map.insert(key.to_string(), value);
        }
        Self { arguments_map }
    }
}

impl From<&serde_json::Map<String, serde_json::Value>> for ArgumentsMap {
    fn from(args: &serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            arguments_map: args
                .iter()
                .map(|(key, value)| (key.clone(), Value::from(value)))
                .collect(),
        }
    }
}

impl ArgumentsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_argument(&mut self, key: String, value: Value) {
        self.arguments_map.insert(key, value);
    }

    pub fn has_argument(&self, key: &str) -> bool {
        self.arguments_map.contains_key(key)
    }

    pub fn get_argument(&self, key: &str) -> Option<&Value> {
        self.arguments_map.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.arguments_map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.arguments_map.iter()
    }

    pub fn collect_variables(&self, names: &mut BTreeSet<String>) {
        for value in self.arguments_map.values() {
            value.collect_variables(names);
        }
    }
}

impl Display for ArgumentsMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (name, value)) in self.arguments_map.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Directive {
    pub name: String,
    pub arguments: Option<ArgumentsMap>,
}

impl From<&graphql_parser::query::Directive<'_, String>> for Directive {
    fn from(directive: &graphql_parser::query::Directive<'_, String>) -> Self {
        Self {
            name: directive.name.clone(),
            arguments: match directive.arguments.len() {
                0 => None,
                _ => Some((&directive.arguments).into()),
            },
        }
    }
}

impl Directive {
    pub fn collect_variables(&self, names: &mut BTreeSet<String>) {
        if let Some(arguments) = &self.arguments {
            arguments.collect_variables(names);
        }
    }
}

impl Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.name)?;
        if let Some(arguments) = &self.arguments {
            write!(f, "({})", arguments)?;
        }

        Ok(())
    }
}
