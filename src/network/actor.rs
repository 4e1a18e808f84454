//! Network actor - runs API calls in the Tokio runtime
//!
//! One task per command; results come back as `NetworkResponse`s tagged
//! with the originating request id. Nothing is retried and in-flight
//! requests are not cancelled; a late response for a stale id is simply
//! dropped by the app layer.

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client;

pub struct NetworkActor {
    client: reqwest::Client,
    base_url: String,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(response_tx: mpsc::UnboundedSender<NetworkResponse>, base_url: String) -> Self {
        NetworkActor {
            client: client::create_client(),
            base_url,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Shutdown) | None => break,
                        Some(cmd) => self.dispatch(cmd),
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }

    fn dispatch(&mut self, cmd: NetworkCommand) {
        let client = self.client.clone();
        let base = self.base_url.clone();
        let tx = self.response_tx.clone();

        match cmd {
            NetworkCommand::Login { id, username, password } => {
                self.active_requests.spawn(async move {
                    tracing::info!(id, %username, "login");
                    let resp = match client::login(&client, &base, &username, &password).await {
                        Ok((token, user)) => NetworkResponse::AuthOk { id, token, user },
                        Err(e) => NetworkResponse::AuthFailed { id, message: e.to_string() },
                    };
                    let _ = tx.send(resp);
                });
            }

            NetworkCommand::Register { id, username, email, password } => {
                self.active_requests.spawn(async move {
                    tracing::info!(id, %username, "register");
                    let resp = match client::register_and_login(
                        &client, &base, &username, &email, &password,
                    )
                    .await
                    {
                        Ok((token, user)) => NetworkResponse::AuthOk { id, token, user },
                        Err(e) => NetworkResponse::AuthFailed { id, message: e.to_string() },
                    };
                    let _ = tx.send(resp);
                });
            }

            NetworkCommand::FetchAccounts { id, token } => {
                self.active_requests.spawn(async move {
                    let resp = match client::list_accounts(&client, &base, &token).await {
                        Ok(accounts) => NetworkResponse::Accounts { id, accounts },
                        Err(e) => NetworkResponse::Failed { id, message: e.to_string() },
                    };
                    let _ = tx.send(resp);
                });
            }

            NetworkCommand::CreateAccount { id, token, name, balance } => {
                self.active_requests.spawn(async move {
                    tracing::info!(id, %name, "create account");
                    let resp = match client::create_account(&client, &base, &token, &name, balance)
                        .await
                    {
                        Ok(()) => NetworkResponse::AccountCreated { id },
                        Err(e) => NetworkResponse::Failed { id, message: e.to_string() },
                    };
                    let _ = tx.send(resp);
                });
            }

            NetworkCommand::RenameAccount { id, token, account_id, name } => {
                self.active_requests.spawn(async move {
                    let resp = match client::rename_account(&client, &base, &token, account_id, &name)
                        .await
                    {
                        Ok(()) => NetworkResponse::AccountRenamed { id },
                        Err(e) => NetworkResponse::Failed { id, message: e.to_string() },
                    };
                    let _ = tx.send(resp);
                });
            }

            NetworkCommand::DeleteAccount { id, token, account_id } => {
                self.active_requests.spawn(async move {
                    tracing::info!(id, account_id, "delete account");
                    let resp = match client::delete_account(&client, &base, &token, account_id).await
                    {
                        Ok(()) => NetworkResponse::AccountDeleted { id, account_id },
                        Err(e) => NetworkResponse::Failed { id, message: e.to_string() },
                    };
                    let _ = tx.send(resp);
                });
            }

            NetworkCommand::FetchTransactions { id, token, account_id } => {
                self.active_requests.spawn(async move {
                    let resp =
                        match client::list_transactions(&client, &base, &token, account_id).await {
                            Ok(transactions) => NetworkResponse::Transactions { id, transactions },
                            Err(e) => NetworkResponse::Failed { id, message: e.to_string() },
                        };
                    let _ = tx.send(resp);
                });
            }

            NetworkCommand::CreateTransaction { id, token, transaction } => {
                self.active_requests.spawn(async move {
                    tracing::info!(id, kind = transaction.kind.as_str(), "create transaction");
                    let resp =
                        match client::create_transaction(&client, &base, &token, &transaction).await
                        {
                            Ok(()) => NetworkResponse::TransactionCreated { id },
                            Err(e) => NetworkResponse::Failed { id, message: e.to_string() },
                        };
                    let _ = tx.send(resp);
                });
            }

            NetworkCommand::DeleteTransaction { id, token, transaction_id } => {
                self.active_requests.spawn(async move {
                    let resp =
                        match client::delete_transaction(&client, &base, &token, transaction_id)
                            .await
                        {
                            Ok(()) => NetworkResponse::TransactionDeleted { id, transaction_id },
                            Err(e) => NetworkResponse::Failed { id, message: e.to_string() },
                        };
                    let _ = tx.send(resp);
                });
            }

            NetworkCommand::FetchDashboard { id, token } => {
                self.active_requests.spawn(async move {
                    let resp = match client::get_dashboard(&client, &base, &token).await {
                        Ok(data) => NetworkResponse::Dashboard { id, data },
                        Err(e) => NetworkResponse::Failed { id, message: e.to_string() },
                    };
                    let _ = tx.send(resp);
                });
            }

            NetworkCommand::Shutdown => {}
        }
    }
}
