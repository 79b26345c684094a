//! Record type.

use std::collections::HashMap;

/// One data row keyed by field name.
///
/// A record is a lookup structure, not a sequence: iteration order carries no
/// meaning. Readers produce a fresh record per row and hand it to the caller;
/// writers lay a record out by the writer's field list.
pub type Record = HashMap<String, String>;
