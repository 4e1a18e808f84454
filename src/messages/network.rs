//! Network messages - communication between App and Network layers

use crate::models::{Account, DashboardData, NewTransaction, Transaction, User};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// POST /login
    Login {
        id: u64,
        username: String,
        password: String,
    },
    /// POST /register followed by a login with the same credentials
    Register {
        id: u64,
        username: String,
        email: String,
        password: String,
    },

    /// GET /accounts
    FetchAccounts { id: u64, token: String },
    /// POST /accounts
    CreateAccount {
        id: u64,
        token: String,
        name: String,
        balance: f64,
    },
    /// PUT /accounts/{id} - name only, balance is immutable post-creation
    RenameAccount {
        id: u64,
        token: String,
        account_id: i64,
        name: String,
    },
    /// DELETE /accounts/{id}
    DeleteAccount {
        id: u64,
        token: String,
        account_id: i64,
    },

    /// GET /transactions, optionally scoped to one account
    FetchTransactions {
        id: u64,
        token: String,
        account_id: Option<i64>,
    },
    /// POST /transactions
    CreateTransaction {
        id: u64,
        token: String,
        transaction: NewTransaction,
    },
    /// DELETE /transactions/{id}
    DeleteTransaction {
        id: u64,
        token: String,
        transaction_id: i64,
    },

    /// GET /dashboard
    FetchDashboard { id: u64, token: String },

    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// Login or register completed with a usable token
    AuthOk { id: u64, token: String, user: User },
    /// Login or register failed (server rejection or unusable response)
    AuthFailed { id: u64, message: String },

    Accounts {
        id: u64,
        accounts: Vec<Account>,
    },
    AccountCreated {
        id: u64,
    },
    AccountRenamed {
        id: u64,
    },
    AccountDeleted {
        id: u64,
        account_id: i64,
    },

    Transactions {
        id: u64,
        transactions: Vec<Transaction>,
    },
    TransactionCreated {
        id: u64,
    },
    TransactionDeleted {
        id: u64,
        transaction_id: i64,
    },

    Dashboard {
        id: u64,
        data: DashboardData,
    },

    /// Any data operation that failed
    Failed {
        id: u64,
        message: String,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::AuthOk { id, .. } => *id,
            NetworkResponse::AuthFailed { id, .. } => *id,
            NetworkResponse::Accounts { id, .. } => *id,
            NetworkResponse::AccountCreated { id } => *id,
            NetworkResponse::AccountRenamed { id } => *id,
            NetworkResponse::AccountDeleted { id, .. } => *id,
            NetworkResponse::Transactions { id, .. } => *id,
            NetworkResponse::TransactionCreated { id } => *id,
            NetworkResponse::TransactionDeleted { id, .. } => *id,
            NetworkResponse::Dashboard { id, .. } => *id,
            NetworkResponse::Failed { id, .. } => *id,
        }
    }
}
