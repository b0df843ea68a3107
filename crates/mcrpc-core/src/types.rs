//! Result records and request-side value types for node verbs.
//!
//! Records keep only the fields callers commonly need; unknown fields are
//! ignored so newer node versions stay compatible. Verbs whose shape depends
//! on call-site options return `serde_json::Value` or are generic over the
//! result type.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::binary_cache::BinaryCacheHandle;
use crate::error::FieldError;

// ==============================================================================
// Node
// ==============================================================================

/// Node and chain summary from `getinfo`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeInfo {
    pub version: String,
    #[serde(default)]
    pub nodeversion: u64,
    #[serde(default)]
    pub protocolversion: u64,
    pub chainname: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub nodeaddress: String,
    #[serde(default)]
    pub burnaddress: String,
    pub blocks: u64,
    #[serde(default)]
    pub connections: u64,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub errors: String,
}

// ==============================================================================
// Blocks
// ==============================================================================

/// Block selector: `getblock` accepts either a hash or a height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockRef {
    Height(u64),
    Hash(String),
}

impl From<u64> for BlockRef {
    fn from(h: u64) -> Self {
        Self::Height(h)
    }
}

impl From<&str> for BlockRef {
    fn from(hash: &str) -> Self {
        Self::Hash(hash.to_owned())
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Height(h) => write!(f, "{h}"),
            Self::Hash(hash) => f.write_str(hash),
        }
    }
}

/// Verbosity levels accepted by `getblock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockVerbosity {
    /// Serialized block as a hex string.
    Hex = 0,
    /// Header fields plus transaction ids.
    TxIds = 1,
    /// Header fields plus fully decoded transactions.
    Full = 4,
}

/// `getblock` at [`BlockVerbosity::TxIds`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConciseBlock {
    pub hash: String,
    pub height: u64,
    pub time: u64,
    #[serde(default)]
    pub confirmations: i64,
    pub tx: Vec<String>,
}

/// `getblock` at [`BlockVerbosity::Full`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VerboseBlock {
    pub hash: String,
    pub height: u64,
    #[serde(default)]
    pub miner: Option<String>,
    #[serde(default)]
    pub confirmations: i64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub merkleroot: String,
    pub time: u64,
    #[serde(default)]
    pub nonce: u64,
    #[serde(default)]
    pub difficulty: f64,
    #[serde(default)]
    pub previousblockhash: Option<String>,
    #[serde(default)]
    pub nextblockhash: Option<String>,
    pub tx: Vec<Value>,
}

// ==============================================================================
// Addresses & Permissions
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddressValidation {
    pub isvalid: bool,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub ismine: bool,
    #[serde(default)]
    pub iswatchonly: bool,
    #[serde(default)]
    pub isscript: bool,
    #[serde(default)]
    pub pubkey: Option<String>,
}

/// One row of `listpermissions`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PermissionEntry {
    pub address: String,
    /// Entity the permission applies to; `null` for global permissions.
    #[serde(default, rename = "for")]
    pub entity: Option<Value>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub startblock: u64,
    #[serde(default)]
    pub endblock: u64,
}

// ==============================================================================
// Assets
// ==============================================================================

/// Asset to issue: a name plus whether follow-on issuance is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetSpec {
    pub name: String,
    pub open: bool,
}

impl AssetSpec {
    pub fn closed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            open: false,
        }
    }

    pub fn open(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            open: true,
        }
    }

    pub(crate) fn to_value(&self) -> Value {
        serde_json::json!({ "name": self.name, "open": self.open })
    }
}

/// One row of `listassets`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetInfo {
    #[serde(default)]
    pub name: Option<String>,
    pub issuetxid: String,
    #[serde(default)]
    pub assetref: Option<String>,
    #[serde(default)]
    pub multiple: u64,
    #[serde(default)]
    pub units: f64,
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub details: Value,
    #[serde(default)]
    pub issueqty: f64,
    #[serde(default)]
    pub issueraw: u64,
}

/// One row of `getaddressbalances`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetBalance {
    pub name: String,
    #[serde(default)]
    pub assetref: Option<String>,
    pub qty: f64,
}

/// Asset name to quantity, sent as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetAmounts {
    entries: Vec<(String, f64)>,
}

impl AssetAmounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, asset: impl Into<String>, qty: f64) -> Self {
        self.entries.push((asset.into(), qty));
        self
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        let mut seen = std::collections::HashSet::with_capacity(self.entries.len());
        for (name, qty) in &self.entries {
            if name.is_empty() {
                return Err(FieldError::EmptyKey);
            }
            if !seen.insert(name.as_str()) {
                return Err(FieldError::DuplicateKey(name.clone()));
            }
            if !qty.is_finite() {
                return Err(FieldError::NonFinite(name.clone()));
            }
        }
        Ok(())
    }

    /// Validate and convert into the JSON object sent to the node.
    pub(crate) fn to_value(&self) -> Result<Value, FieldError> {
        self.validate()?;
        Ok(Value::Object(
            self.entries
                .iter()
                .map(|(name, qty)| (name.clone(), Value::from(*qty)))
                .collect(),
        ))
    }
}

impl Serialize for AssetAmounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, qty) in &self.entries {
            map.serialize_entry(name, qty)?;
        }
        map.end()
    }
}

// ==============================================================================
// Streams & Filters
// ==============================================================================

/// One row of `liststreams`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamInfo {
    pub name: String,
    pub createtxid: String,
    #[serde(default)]
    pub streamref: Option<String>,
    #[serde(default)]
    pub restrict: Option<Value>,
    #[serde(default)]
    pub details: Value,
    #[serde(default)]
    pub subscribed: Option<bool>,
    #[serde(default)]
    pub items: Option<u64>,
    #[serde(default)]
    pub keys: Option<u64>,
}

/// One item returned by `liststreamitems` / `liststreamkeyitems`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamItem {
    #[serde(default)]
    pub publishers: Vec<String>,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub offchain: bool,
    #[serde(default = "default_true")]
    pub available: bool,
    pub data: Value,
    #[serde(default)]
    pub confirmations: u64,
    #[serde(default)]
    pub blocktime: Option<u64>,
    pub txid: String,
}

fn default_true() -> bool {
    true
}

/// Payload of a stream item.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamData {
    /// Raw bytes, sent hex-encoded.
    Raw(Vec<u8>),
    Text(String),
    Json(crate::rpc::CustomFields),
    /// Content previously staged in a binary cache.
    Cache(BinaryCacheHandle),
}

impl StreamData {
    pub(crate) fn to_value(&self) -> Result<Value, FieldError> {
        Ok(match self {
            Self::Raw(bytes) => Value::String(hex::encode(bytes)),
            Self::Text(text) => serde_json::json!({ "text": text }),
            Self::Json(fields) => serde_json::json!({ "json": fields.to_value()? }),
            Self::Cache(handle) => serde_json::json!({ "cache": handle.as_str() }),
        })
    }
}

/// Kinds of filter the node can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Stream,
    Transaction,
}

impl FilterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stream => "streamfilter",
            Self::Transaction => "txfilter",
        }
    }
}

/// One row of `liststreamfilters` / `listtxfilters`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilterInfo {
    pub name: String,
    pub createtxid: String,
    #[serde(default)]
    pub filterref: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub codelength: Option<u64>,
    #[serde(default)]
    pub approved: Option<bool>,
}

// ==============================================================================
// Exchanges
// ==============================================================================

/// Output locked by `preparelockunspent`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LockedOutput {
    pub txid: String,
    pub vout: u32,
}

/// Result of `appendrawexchange`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppendedExchange {
    pub hex: String,
    pub complete: bool,
}

/// Result of `decoderawexchange` (non-verbose).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecodedExchange {
    pub offer: Value,
    pub ask: Value,
    #[serde(default)]
    pub cancomplete: bool,
    #[serde(default)]
    pub candisable: bool,
}
