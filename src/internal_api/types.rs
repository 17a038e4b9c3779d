use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UpdatePairingResponse {
    pub success: bool,
    pub matched: u64,
    pub modified: u64,
}
