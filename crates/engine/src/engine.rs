//! Trade settlement and account lifecycle.

use crate::credentials::{generate_salt, hash_password, verify_password};
use crate::error::EngineError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use store::AccountStore;
use tracing::{debug, info};
use types::{Account, Cash, Holdings, Price, Quantity, Symbol};

/// Reserved username for deployments without authentication. Materialized
/// in the store with the starting balance on first use.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Account state after a settlement (or a plain snapshot of it).
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    /// Cash remaining after the trade.
    pub balance: Cash,
    /// All positions, zero entries included.
    pub holdings: Holdings,
}

impl Settlement {
    fn of(account: &Account) -> Self {
        Self {
            balance: account.balance,
            holdings: account.holdings.clone(),
        }
    }
}

/// Settles trades and manages account lifecycle.
///
/// Every mutation of an account's record runs under that account's own
/// async mutex, so two concurrent buys for the same user cannot both read
/// the stale balance and lose an update. The price is a snapshot the
/// caller took once; the whole order settles at that one price.
pub struct TradeEngine {
    store: Arc<dyn AccountStore>,
    symbol: Symbol,
    starting_balance: Cash,
    /// One async mutex per account, created on first use and kept forever.
    /// The outer lock only guards the map itself.
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl TradeEngine {
    /// Build an engine trading `symbol` against `store`.
    pub fn new(store: Arc<dyn AccountStore>, symbol: impl Into<Symbol>, starting_balance: Cash) -> Self {
        Self {
            store,
            symbol: symbol.into(),
            starting_balance,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The single symbol this engine trades.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    fn lock_for(&self, username: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock();
        locks
            .entry(username.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Load an account. Only the anonymous identity is created on demand;
    /// named accounts exist iff they were registered.
    fn load_account(&self, username: &str) -> Result<Account, EngineError> {
        if let Some(account) = self.store.load(username)? {
            return Ok(account);
        }

        if username == ANONYMOUS_USER {
            let account = Account::new(ANONYMOUS_USER, self.starting_balance);
            self.store.create(&account)?;
            info!(balance = %account.balance, "materialized anonymous account");
            return Ok(account);
        }

        Err(EngineError::AccountNotFound(username.to_string()))
    }

    /// Buy `quantity` shares at `price`, debiting the account's balance.
    ///
    /// Rejected with [`EngineError::InsufficientFunds`] when the balance
    /// cannot cover the full cost; the account is untouched on rejection.
    pub async fn buy(
        &self,
        username: &str,
        price: Price,
        quantity: Quantity,
    ) -> Result<Settlement, EngineError> {
        if quantity.is_zero() {
            return Err(EngineError::Validation("quantity must be positive".to_string()));
        }

        let lock = self.lock_for(username);
        let _guard = lock.lock().await;

        let mut account = self.load_account(username)?;
        // A cost too large for the money type can never be covered; the
        // quantity is caller-chosen, so this must not wrap.
        let cost = price
            .checked_mul(quantity)
            .ok_or(EngineError::InsufficientFunds)?;
        if account.balance < cost {
            return Err(EngineError::InsufficientFunds);
        }

        account.balance -= cost;
        *account
            .holdings
            .entry(self.symbol.clone())
            .or_insert(Quantity::ZERO) += quantity;
        self.store.save(&account)?;

        debug!(
            user = username,
            %price,
            quantity = %quantity,
            balance = %account.balance,
            "buy settled"
        );
        Ok(Settlement::of(&account))
    }

    /// Sell `quantity` shares at `price`, crediting the account's balance.
    ///
    /// Rejected with [`EngineError::InsufficientHoldings`] when the
    /// position is smaller than the order. A position sold down to zero
    /// keeps its map entry, so clients see `{"AAPL": 0}` rather than an
    /// empty object.
    pub async fn sell(
        &self,
        username: &str,
        price: Price,
        quantity: Quantity,
    ) -> Result<Settlement, EngineError> {
        if quantity.is_zero() {
            return Err(EngineError::Validation("quantity must be positive".to_string()));
        }

        let lock = self.lock_for(username);
        let _guard = lock.lock().await;

        let mut account = self.load_account(username)?;
        // Holdings are checked first, so an oversized sell reads as "not
        // enough stocks"; the checked multiply guards the proceeds anyway.
        let proceeds = match account.holdings.get_mut(&self.symbol) {
            Some(held) if *held >= quantity => {
                let proceeds = price
                    .checked_mul(quantity)
                    .ok_or_else(|| EngineError::Validation("quantity too large".to_string()))?;
                *held -= quantity;
                proceeds
            }
            _ => return Err(EngineError::InsufficientHoldings),
        };
        account.balance += proceeds;
        self.store.save(&account)?;

        debug!(
            user = username,
            %price,
            quantity = %quantity,
            balance = %account.balance,
            "sell settled"
        );
        Ok(Settlement::of(&account))
    }

    /// Create a new account with the starting balance and a salted
    /// password digest.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), EngineError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(EngineError::Validation(
                "username and password are required".to_string(),
            ));
        }

        let lock = self.lock_for(username);
        let _guard = lock.lock().await;

        let salt = generate_salt();
        let account = Account::new(username, self.starting_balance)
            .with_credentials(hash_password(password, &salt), salt);

        match self.store.create(&account) {
            Ok(()) => {
                info!(user = username, "account registered");
                Ok(())
            }
            Err(store::StoreError::Duplicate(_)) => Err(EngineError::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    /// Check a username/password pair, returning the account on success.
    ///
    /// Unknown user and wrong password both come back as
    /// [`EngineError::InvalidCredentials`]; callers cannot tell which.
    pub fn verify_login(&self, username: &str, password: &str) -> Result<Account, EngineError> {
        let account = match self.store.load(username)? {
            Some(account) => account,
            None => return Err(EngineError::InvalidCredentials),
        };

        if !verify_password(password, &account.salt, &account.password_hash) {
            return Err(EngineError::InvalidCredentials);
        }

        Ok(account)
    }

    /// Current balance and holdings without trading.
    pub async fn account_snapshot(&self, username: &str) -> Result<Settlement, EngineError> {
        let lock = self.lock_for(username);
        let _guard = lock.lock().await;

        let account = self.load_account(username)?;
        Ok(Settlement::of(&account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{SqliteStore, StoreError};

    fn engine() -> TradeEngine {
        let store = Arc::new(SqliteStore::open(":memory:").unwrap());
        TradeEngine::new(store, "AAPL", Cash::from_float(10_000.0))
    }

    async fn registered(engine: &TradeEngine, username: &str) {
        engine.register(username, "hunter2").await.unwrap();
    }

    #[tokio::test]
    async fn test_buy_debits_balance_and_credits_holdings() {
        let engine = engine();
        registered(&engine, "alice").await;

        let settled = engine
            .buy("alice", Price::from_float(150.0), Quantity(1))
            .await
            .unwrap();

        assert_eq!(settled.balance, Cash::from_float(9_850.0));
        assert_eq!(settled.holdings.get("AAPL"), Some(&Quantity(1)));
    }

    #[tokio::test]
    async fn test_sell_reverses_a_buy_and_keeps_zero_entry() {
        let engine = engine();
        registered(&engine, "alice").await;

        let price = Price::from_float(150.0);
        engine.buy("alice", price, Quantity(1)).await.unwrap();
        let settled = engine.sell("alice", price, Quantity(1)).await.unwrap();

        assert_eq!(settled.balance, Cash::from_float(10_000.0));
        // Flat position stays visible as an explicit zero.
        assert_eq!(settled.holdings.get("AAPL"), Some(&Quantity::ZERO));
    }

    #[tokio::test]
    async fn test_buy_rejected_when_balance_short() {
        let store = Arc::new(SqliteStore::open(":memory:").unwrap());
        let engine = TradeEngine::new(store.clone(), "AAPL", Cash::from_float(100.0));
        registered(&engine, "alice").await;

        let err = engine
            .buy("alice", Price::from_float(150.0), Quantity(1))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientFunds));

        // Rejection leaves the account untouched.
        let account = store.load("alice").unwrap().unwrap();
        assert_eq!(account.balance, Cash::from_float(100.0));
        assert!(account.holdings.is_empty());
    }

    #[tokio::test]
    async fn test_sell_rejected_without_position() {
        let engine = engine();
        registered(&engine, "alice").await;

        let err = engine
            .sell("alice", Price::from_float(150.0), Quantity(1))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientHoldings));

        let snapshot = engine.account_snapshot("alice").await.unwrap();
        assert_eq!(snapshot.balance, Cash::from_float(10_000.0));
    }

    #[tokio::test]
    async fn test_multi_unit_settlement() {
        let engine = engine();
        registered(&engine, "alice").await;

        let settled = engine
            .buy("alice", Price::from_float(150.0), Quantity(3))
            .await
            .unwrap();
        assert_eq!(settled.balance, Cash::from_float(9_550.0));
        assert_eq!(settled.holdings.get("AAPL"), Some(&Quantity(3)));

        let settled = engine
            .sell("alice", Price::from_float(160.0), Quantity(2))
            .await
            .unwrap();
        assert_eq!(settled.balance, Cash::from_float(9_870.0));
        assert_eq!(settled.holdings.get("AAPL"), Some(&Quantity(1)));
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected() {
        let engine = engine();
        registered(&engine, "alice").await;

        let price = Price::from_float(150.0);
        assert!(matches!(
            engine.buy("alice", price, Quantity::ZERO).await,
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            engine.sell("alice", price, Quantity::ZERO).await,
            Err(EngineError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_overflowing_buy_quantity_rejected() {
        let store = Arc::new(SqliteStore::open(":memory:").unwrap());
        let engine = TradeEngine::new(store.clone(), "AAPL", Cash::from_float(10_000.0));
        engine.register("alice", "hunter2").await.unwrap();

        let price = Price::from_float(150.0); // Price(1_500_000)
        // A cost past i64 must read as unaffordable, never wrap negative
        // and slip through the solvency check.
        let first_overflow = (i64::MAX / 1_500_000) as u64 + 1;
        for quantity in [10_000_000_000_000, first_overflow, u64::MAX] {
            let err = engine
                .buy("alice", price, Quantity(quantity))
                .await
                .unwrap_err();
            assert!(matches!(err, EngineError::InsufficientFunds));
        }

        // Every rejection left the account untouched.
        let account = store.load("alice").unwrap().unwrap();
        assert_eq!(account.balance, Cash::from_float(10_000.0));
        assert!(account.holdings.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_sell_quantity_rejected() {
        let engine = engine();
        registered(&engine, "alice").await;

        let price = Price::from_float(150.0);
        engine.buy("alice", price, Quantity(1)).await.unwrap();

        // The holdings check fires before any arithmetic.
        let err = engine
            .sell("alice", price, Quantity(u64::MAX))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientHoldings));

        let snapshot = engine.account_snapshot("alice").await.unwrap();
        assert_eq!(snapshot.balance, Cash::from_float(9_850.0));
        assert_eq!(snapshot.holdings.get("AAPL"), Some(&Quantity(1)));
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let engine = engine();
        registered(&engine, "alice").await;

        let err = engine.register("alice", "other-password").await.unwrap_err();
        assert!(matches!(err, EngineError::Duplicate));

        // The original credentials still work.
        assert!(engine.verify_login("alice", "hunter2").is_ok());
    }

    #[tokio::test]
    async fn test_empty_credentials_rejected() {
        let engine = engine();
        assert!(matches!(
            engine.register("", "hunter2").await,
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            engine.register("alice", "").await,
            Err(EngineError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_login_verification() {
        let engine = engine();
        registered(&engine, "alice").await;

        let account = engine.verify_login("alice", "hunter2").unwrap();
        assert_eq!(account.username, "alice");

        assert!(matches!(
            engine.verify_login("alice", "wrong"),
            Err(EngineError::InvalidCredentials)
        ));
        assert!(matches!(
            engine.verify_login("nobody", "hunter2"),
            Err(EngineError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_unknown_named_account_is_not_found() {
        let engine = engine();
        let err = engine
            .buy("ghost", Price::from_float(150.0), Quantity(1))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::AccountNotFound(name) if name == "ghost"));
    }

    #[tokio::test]
    async fn test_anonymous_account_materializes_once() {
        let store = Arc::new(SqliteStore::open(":memory:").unwrap());
        let engine = TradeEngine::new(store.clone(), "AAPL", Cash::from_float(10_000.0));

        let snapshot = engine.account_snapshot(ANONYMOUS_USER).await.unwrap();
        assert_eq!(snapshot.balance, Cash::from_float(10_000.0));

        engine
            .buy(ANONYMOUS_USER, Price::from_float(150.0), Quantity(1))
            .await
            .unwrap();

        let account = store.load(ANONYMOUS_USER).unwrap().unwrap();
        assert_eq!(account.balance, Cash::from_float(9_850.0));
    }

    #[tokio::test]
    async fn test_concurrent_buys_serialize_per_account() {
        let store = Arc::new(SqliteStore::open(":memory:").unwrap());
        let engine = Arc::new(TradeEngine::new(
            store.clone(),
            "AAPL",
            Cash::from_float(10_000.0),
        ));
        engine.register("alice", "hunter2").await.unwrap();

        let price = Price::from_float(100.0);
        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let engine = engine.clone();
                tokio::spawn(async move { engine.buy("alice", price, Quantity(1)).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        // No lost updates: all eight debits landed.
        let account = store.load("alice").unwrap().unwrap();
        assert_eq!(account.balance, Cash::from_float(9_200.0));
        assert_eq!(account.holding("AAPL"), Quantity(8));
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let engine = engine();
        registered(&engine, "alice").await;

        // A duplicate at the store layer (not via register) maps through.
        let store_err = StoreError::Duplicate("alice".to_string());
        assert!(matches!(
            EngineError::from(store_err),
            EngineError::Store(StoreError::Duplicate(_))
        ));
    }
}
