//! Data access for the four entity kinds.
//!
//! Handlers only see the [`Repository`] and [`ChildRepository`] traits; the
//! concrete backend is chosen at startup ([`PgStore`] or [`MemoryStore`]).

mod memory;
mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{
    Company, CompanyForm, CryptoPrice, CryptoPriceForm, Cryptocurrency, CryptocurrencyForm,
    NewCompany, NewCryptoPrice, NewCryptocurrency, NewStockPrice, StockPrice, StockPriceForm,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Company,
    StockPrice,
    Cryptocurrency,
    CryptoPrice,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Company => "Company",
            EntityKind::StockPrice => "Stock price",
            EntityKind::Cryptocurrency => "Cryptocurrency",
            EntityKind::CryptoPrice => "Crypto price",
        };
        f.write_str(name)
    }
}

/// A persisted row type together with the form that creates and updates it.
pub trait Entity: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Raw input, every field optional.
    type Form: Send + 'static;
    /// Input that passed validation and can be written as is.
    type Draft: Send + 'static;

    fn validate(form: Self::Form) -> Result<Self::Draft, AppError>;
    /// Completes an update form with the stored values of `current`.
    fn merge(form: Self::Form, current: &Self) -> Self::Form;
}

/// An entity owned by a parent through a foreign key.
pub trait ChildEntity: Entity {
    type Parent: Entity;

    fn parent_id(&self) -> i64;
    fn draft_parent_id(draft: &Self::Draft) -> i64;
}

/// A parent together with all of its children.
#[derive(Debug, Clone, PartialEq)]
pub struct WithChildren<P, C> {
    pub parent: P,
    pub children: Vec<C>,
}

#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Every row, in insertion order.
    async fn list_all(&self) -> Result<Vec<E>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<E, AppError>;

    /// Validates the form and inserts it; nothing is written when validation fails.
    async fn create(&self, form: E::Form) -> Result<E, AppError>;

    /// Replaces the fields present in `form`, keeping the others.
    async fn update(&self, id: i64, form: E::Form) -> Result<E, AppError>;

    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait ChildRepository<C: ChildEntity>: Repository<C> {
    /// Children of one parent, in insertion order. The parent is not checked.
    async fn list_children(&self, parent_id: i64) -> Result<Vec<C>, AppError>;

    /// Parent and children in a single read. Yields the same children as
    /// [`ChildRepository::list_children`], in the same order.
    async fn find_with_children(
        &self,
        parent_id: i64,
    ) -> Result<WithChildren<C::Parent, C>, AppError>;
}

/// Everything the HTTP layer needs from a backend.
pub trait Store:
    Repository<Company>
    + ChildRepository<StockPrice>
    + Repository<Cryptocurrency>
    + ChildRepository<CryptoPrice>
    + 'static
{
}

impl<T> Store for T where
    T: Repository<Company>
        + ChildRepository<StockPrice>
        + Repository<Cryptocurrency>
        + ChildRepository<CryptoPrice>
        + 'static
{
}

pub(crate) fn not_found<E: Entity>(id: i64) -> AppError {
    AppError::NotFound(format!("{} {} not found", E::KIND, id))
}

pub(crate) fn parent_missing<C: ChildEntity>() -> AppError {
    AppError::Validation(format!("{} must exist", <C::Parent as Entity>::KIND))
}

pub(crate) fn has_dependents<P: Entity>(id: i64) -> AppError {
    AppError::Conflict(format!("{} {} still has dependent price records", P::KIND, id))
}

impl Entity for Company {
    const KIND: EntityKind = EntityKind::Company;
    type Form = CompanyForm;
    type Draft = NewCompany;

    fn validate(form: CompanyForm) -> Result<NewCompany, AppError> {
        form.validate()
    }

    fn merge(form: CompanyForm, current: &Self) -> CompanyForm {
        form.merged_with(current)
    }
}

impl Entity for StockPrice {
    const KIND: EntityKind = EntityKind::StockPrice;
    type Form = StockPriceForm;
    type Draft = NewStockPrice;

    fn validate(form: StockPriceForm) -> Result<NewStockPrice, AppError> {
        form.validate()
    }

    fn merge(form: StockPriceForm, current: &Self) -> StockPriceForm {
        form.merged_with(current)
    }
}

impl ChildEntity for StockPrice {
    type Parent = Company;

    fn parent_id(&self) -> i64 {
        self.company_id
    }

    fn draft_parent_id(draft: &NewStockPrice) -> i64 {
        draft.company_id
    }
}

impl Entity for Cryptocurrency {
    const KIND: EntityKind = EntityKind::Cryptocurrency;
    type Form = CryptocurrencyForm;
    type Draft = NewCryptocurrency;

    fn validate(form: CryptocurrencyForm) -> Result<NewCryptocurrency, AppError> {
        form.validate()
    }

    fn merge(form: CryptocurrencyForm, current: &Self) -> CryptocurrencyForm {
        form.merged_with(current)
    }
}

impl Entity for CryptoPrice {
    const KIND: EntityKind = EntityKind::CryptoPrice;
    type Form = CryptoPriceForm;
    type Draft = NewCryptoPrice;

    fn validate(form: CryptoPriceForm) -> Result<NewCryptoPrice, AppError> {
        form.validate()
    }

    fn merge(form: CryptoPriceForm, current: &Self) -> CryptoPriceForm {
        form.merged_with(current)
    }
}

impl ChildEntity for CryptoPrice {
    type Parent = Cryptocurrency;

    fn parent_id(&self) -> i64 {
        self.cryptocurrency_id
    }

    fn draft_parent_id(draft: &NewCryptoPrice) -> i64 {
        draft.cryptocurrency_id
    }
}
