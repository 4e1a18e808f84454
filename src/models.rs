use serde::{Deserialize, Serialize};

/// Authenticated user identity, owned by the session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// A money account as returned by the server
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub balance: f64,
    pub created_at: String,
}

/// Transaction kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Transfer => "transfer",
        }
    }

    pub fn next(&self) -> TransactionType {
        match self {
            TransactionType::Income => TransactionType::Expense,
            TransactionType::Expense => TransactionType::Transfer,
            TransactionType::Transfer => TransactionType::Income,
        }
    }
}

/// A ledger entry as returned by the server
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    /// Set if and only if `kind` is `Transfer`
    pub transfer_to_account_id: Option<i64>,
    pub created_at: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub transfer_to_account_name: Option<String>,
}

/// One row of the server-side monthly aggregation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: u32,
    pub year: i32,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub total: f64,
}

/// Combined payload of `GET /dashboard`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub accounts: Vec<Account>,
    pub total_balance: f64,
    pub recent_transactions: Vec<Transaction>,
    pub monthly_summary: Vec<MonthlySummary>,
}

/// Body of `POST /transactions`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewTransaction {
    pub account_id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_to_account_id: Option<i64>,
}

/// Type filter applied to the transaction ledger
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Income,
    Expense,
    Transfer,
}

impl TypeFilter {
    pub fn next(&self) -> TypeFilter {
        match self {
            TypeFilter::All => TypeFilter::Income,
            TypeFilter::Income => TypeFilter::Expense,
            TypeFilter::Expense => TypeFilter::Transfer,
            TypeFilter::Transfer => TypeFilter::All,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Income => "income",
            TypeFilter::Expense => "expense",
            TypeFilter::Transfer => "transfer",
        }
    }

    fn accepts(&self, kind: TransactionType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Income => kind == TransactionType::Income,
            TypeFilter::Expense => kind == TransactionType::Expense,
            TypeFilter::Transfer => kind == TransactionType::Transfer,
        }
    }
}

/// Client-side ledger filter: type plus free-text search over
/// description and account name (case-insensitive substring)
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    pub kind: TypeFilter,
    pub query: String,
}

impl TransactionFilter {
    pub fn is_active(&self) -> bool {
        self.kind != TypeFilter::All || !self.query.is_empty()
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if !self.kind.accepts(tx.kind) {
            return false;
        }
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        tx.description.to_lowercase().contains(&needle)
            || tx.account_name.to_lowercase().contains(&needle)
    }

    /// Indices into `transactions` of the entries that pass the filter
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<usize> {
        transactions
            .iter()
            .enumerate()
            .filter(|(_, tx)| self.matches(tx))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: i64, kind: TransactionType, description: &str, account_name: &str) -> Transaction {
        Transaction {
            id,
            account_id: 1,
            kind,
            amount: 10.0,
            description: description.to_string(),
            transfer_to_account_id: None,
            created_at: "2025-01-01T00:00:00".to_string(),
            account_name: account_name.to_string(),
            transfer_to_account_name: None,
        }
    }

    #[test]
    fn filter_by_type_and_query_is_case_insensitive() {
        let txs = vec![
            tx(1, TransactionType::Expense, "Rent payment", "Checking"),
            tx(2, TransactionType::Income, "Rent refund", "Checking"),
        ];
        let filter = TransactionFilter {
            kind: TypeFilter::Expense,
            query: "rent".to_string(),
        };
        assert_eq!(filter.apply(&txs), vec![0]);
    }

    #[test]
    fn query_matches_account_name_too() {
        let txs = vec![
            tx(1, TransactionType::Expense, "Groceries", "Rent fund"),
            tx(2, TransactionType::Expense, "Groceries", "Checking"),
        ];
        let filter = TransactionFilter {
            kind: TypeFilter::All,
            query: "RENT".to_string(),
        };
        assert_eq!(filter.apply(&txs), vec![0]);
    }

    #[test]
    fn empty_filter_passes_everything() {
        let txs = vec![
            tx(1, TransactionType::Income, "Salary", "Checking"),
            tx(2, TransactionType::Transfer, "Move savings", "Checking"),
        ];
        let filter = TransactionFilter::default();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&txs), vec![0, 1]);
    }

    #[test]
    fn transaction_type_serializes_lowercase() {
        let body = NewTransaction {
            account_id: 3,
            kind: TransactionType::Transfer,
            amount: 25.0,
            description: "move".to_string(),
            transfer_to_account_id: Some(4),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["type"], "transfer");
        assert_eq!(json["transfer_to_account_id"], 4);
    }

    #[test]
    fn transfer_target_omitted_when_absent() {
        let body = NewTransaction {
            account_id: 3,
            kind: TransactionType::Expense,
            amount: 25.0,
            description: "lunch".to_string(),
            transfer_to_account_id: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("transfer_to_account_id").is_none());
    }
}
