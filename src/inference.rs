use serde::{Deserialize, Serialize};

use crate::types::AmortizationSystem;

/// name tokens that mark a debt as real-estate financing
pub const DEFAULT_REAL_ESTATE_TOKENS: &[&str] = &[
    "imóvel",
    "imovel",
    "casa",
    "apartamento",
    "hipoteca",
    "mortgage",
    "habitacional",
];

/// token table used to guess the amortization convention of a debt by its name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct InferenceTable {
    tokens: Vec<String>,
}

impl InferenceTable {
    /// build a table from arbitrary tokens, matched case-insensitively
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// infer the convention for an account name.
    ///
    /// real-estate names get constant amortization, everything else,
    /// including empty names, gets equal installments.
    pub fn infer_system(&self, account_name: &str) -> AmortizationSystem {
        let name = account_name.to_lowercase();
        if self.tokens.iter().any(|token| name.contains(token.as_str())) {
            AmortizationSystem::ConstantAmortization
        } else {
            AmortizationSystem::EqualInstallment
        }
    }
}

impl From<Vec<String>> for InferenceTable {
    fn from(tokens: Vec<String>) -> Self {
        Self::new(tokens)
    }
}

impl From<InferenceTable> for Vec<String> {
    fn from(table: InferenceTable) -> Self {
        table.tokens
    }
}

impl Default for InferenceTable {
    fn default() -> Self {
        Self::new(DEFAULT_REAL_ESTATE_TOKENS.iter().copied())
    }
}
