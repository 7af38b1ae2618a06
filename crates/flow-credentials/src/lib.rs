//! flow-credentials: almacén de credenciales de servicios por usuario.
//!
//! Los valores se guardan cifrados con AES-256-GCM. La clave se deriva por
//! usuario a partir de un secreto maestro, de modo que un valor cifrado para
//! un usuario no se puede descifrar con la identidad de otro. Garantía
//! central: `decrypt(encrypt(x, u), u) == x`.

pub mod crypto;
pub mod error;
pub mod policy;
pub mod token;
pub mod vault;

pub use crypto::{EncryptedValue, UserCipher};
pub use error::CredentialError;
pub use policy::{AllowAll, SharePolicy, ShareRequest};
pub use token::OAuthToken;
pub use vault::{CredentialVault, OAUTH_TOKEN_KEY};
