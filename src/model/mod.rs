pub mod pairing;
pub mod phone;

pub use pairing::{PairingRequest, PairingStatus, PairingUpdate};
pub use phone::{PhoneError, PhoneNumber};
