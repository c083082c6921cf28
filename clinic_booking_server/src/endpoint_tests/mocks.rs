use clinic_booking_engine::{
    db_types::{
        Account,
        CartItem,
        EmailAddress,
        NewCartItem,
        NewPaymentRecord,
        NewTreatment,
        PaymentRecord,
        Role,
        SettlementOutcome,
        Treatment,
    },
    traits::{
        AccountApiError,
        AccountManagement,
        CartApiError,
        CartManagement,
        CatalogApiError,
        CatalogManagement,
        GatewayAuthorization,
        GatewayError,
        PaymentGateway,
        SettlementStore,
        SettlementStoreError,
    },
};
use mockall::mock;

mock! {
    pub AccountManager {}
    impl AccountManagement for AccountManager {
        async fn upsert_account(&self, email: &EmailAddress) -> Result<Account, AccountApiError>;
        async fn fetch_account_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountApiError>;
        async fn fetch_account_by_id(&self, id: i64) -> Result<Option<Account>, AccountApiError>;
        async fn fetch_all_accounts(&self) -> Result<Vec<Account>, AccountApiError>;
        async fn assign_role(&self, account_id: i64, role: Role) -> Result<Account, AccountApiError>;
        async fn fetch_payments_for_email(&self, email: &EmailAddress) -> Result<Vec<PaymentRecord>, AccountApiError>;
    }
}

mock! {
    pub CartManager {}
    impl CartManagement for CartManager {
        async fn insert_cart_item(&self, item: NewCartItem) -> Result<CartItem, CartApiError>;
        async fn cart_items_for_owner(&self, owner: &EmailAddress) -> Result<Vec<CartItem>, CartApiError>;
        async fn remove_cart_item(&self, id: i64, owner: &EmailAddress) -> Result<bool, CartApiError>;
    }
}

mock! {
    pub CatalogManager {}
    impl CatalogManagement for CatalogManager {
        async fn insert_treatment(&self, treatment: NewTreatment) -> Result<Treatment, CatalogApiError>;
        async fn fetch_treatments(&self) -> Result<Vec<Treatment>, CatalogApiError>;
    }
}

mock! {
    pub SettlementManager {}
    impl SettlementStore for SettlementManager {
        async fn settle_cart_items(&self, payment: NewPaymentRecord) -> Result<SettlementOutcome, SettlementStoreError>;
        async fn payment_by_idempotency_key(&self, key: &str) -> Result<Option<PaymentRecord>, SettlementStoreError>;
    }
}

mock! {
    pub Gateway {}
    impl PaymentGateway for Gateway {
        async fn authorize(&self, amount: i64, currency: &str, idempotency_key: &str) -> Result<GatewayAuthorization, GatewayError>;
    }
}
