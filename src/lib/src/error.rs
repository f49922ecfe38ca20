/// Crate-level error for callers that drive the whole auction

use crate::config::ConfigError;
use crate::curve::CurveError;
use crate::dispatch::DispatchError;
use crate::orderbook::OrderBookError;
use crate::persist::PersistError;
use crate::settlement::SettlementError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    OrderBook(#[from] OrderBookError),

    #[error(transparent)]
    Settlement(#[from] SettlementError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

pub type Result<T> = std::result::Result<T, Error>;
