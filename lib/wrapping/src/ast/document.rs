use std::fmt::{Display, Formatter as FmtFormatter, Result as FmtResult};

use crate::{
    ast::{fragment::FragmentDefinition, operation::OperationDefinition},
    utils::pretty_display::PrettyDisplay,
};

/// A single executable operation together with the fragment definitions it may spread.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub operation: OperationDefinition,
    pub fragments: Vec<FragmentDefinition>,
}

impl Document {
    pub fn fragment(&self, name: &str) -> Option<&FragmentDefinition> {
        self.fragments.iter().find(|fragment| fragment.name == name)
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        write!(f, "{}", self.operation)?;
        for fragment in &self.fragments {
            write!(f, " {}", fragment)?;
        }

        Ok(())
    }
}

impl PrettyDisplay for Document {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        self.operation.pretty_fmt(f, depth)?;
        for fragment in &self.fragments {
            writeln!(f)?;
            fragment.pretty_fmt(f, depth)?;
        }

        Ok(())
    }
}
