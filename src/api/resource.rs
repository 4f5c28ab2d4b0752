use serde::{Serialize, de::DeserializeOwned};

use crate::records::{
    Account, AccountCreate, AccountUpdate, FuturePrediction, FuturePredictionCreate,
    FuturePredictionUpdate, Transaction, TransactionCreate, TransactionUpdate,
};

/// A record type the backend exposes as a REST collection.
pub trait Resource: DeserializeOwned + Send + 'static {
    /// The collection path relative to the API base, with a trailing slash.
    const COLLECTION: &'static str;

    /// The payload accepted by `POST` on the collection.
    type Create: Serialize + Send + Sync;

    /// The payload accepted by `PUT` on a member.
    type Update: Serialize + Send + Sync;

    /// The path of the member with `id`.
    fn member_path(id: i64) -> String {
        format!("{}{id}/", Self::COLLECTION)
    }
}

impl Resource for Transaction {
    const COLLECTION: &'static str = "/transactions/";
    type Create = TransactionCreate;
    type Update = TransactionUpdate;
}

impl Resource for Account {
    const COLLECTION: &'static str = "/accounts/";
    type Create = AccountCreate;
    type Update = AccountUpdate;
}

impl Resource for FuturePrediction {
    const COLLECTION: &'static str = "/future/";
    type Create = FuturePredictionCreate;
    type Update = FuturePredictionUpdate;
}
