//! Client context
//!
//! Everything a transaction flow needs that would otherwise be global:
//! the endpoints, the user's key pair, an optional sponsor key pair and
//! gas defaults. Built once at startup and passed by reference.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::crypto::{Ed25519KeyPair, KeyPair};
use crate::error::{PtbError, PtbResult};
use crate::rpc::{JsonRpcClient, DEFAULT_TIMEOUT_SECS};
use crate::types::SuiAddress;

// =============================================================================
// Networks
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    pub fn fullnode_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
            Network::Devnet => "https://fullnode.devnet.sui.io:443",
            Network::Localnet => "http://127.0.0.1:9000",
        }
    }

    /// Mainnet has no faucet
    pub fn faucet_url(&self) -> Option<&'static str> {
        match self {
            Network::Mainnet => None,
            Network::Testnet => Some("https://faucet.testnet.sui.io"),
            Network::Devnet => Some("https://faucet.devnet.sui.io"),
            Network::Localnet => Some("http://127.0.0.1:9123"),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localnet => "localnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = PtbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "localnet" | "local" => Ok(Network::Localnet),
            other => Err(PtbError::config_error(format!("Unknown network: {}", other))),
        }
    }
}

/// Parse an endpoint URL; plain HTTP is only accepted for local hosts
pub fn validate_endpoint(url: &str) -> PtbResult<Url> {
    let parsed = Url::parse(url)
        .map_err(|e| PtbError::config_error(format!("Invalid URL {}: {}", url, e)))?;

    match parsed.scheme() {
        "https" => {}
        "http" => {
            let local = matches!(parsed.host_str(), Some("localhost") | Some("127.0.0.1") | Some("[::1]"));
            if !local {
                return Err(PtbError::config_error(format!(
                    "HTTPS required for remote endpoint {}",
                    url
                )));
            }
        }
        other => {
            return Err(PtbError::config_error(format!("Unsupported URL scheme: {}", other)));
        }
    }

    if parsed.host_str().is_none() {
        return Err(PtbError::config_error(format!("URL has no host: {}", url)));
    }
    Ok(parsed)
}

/// Resolved endpoints
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub network: Network,
    pub rpc_url: Url,
    pub faucet_url: Option<Url>,
    pub timeout: Duration,
}

impl NetworkConfig {
    /// Network defaults, optionally overridden
    pub fn new(network: Network, rpc_url: Option<&str>, faucet_url: Option<&str>) -> PtbResult<Self> {
        let rpc_url = validate_endpoint(rpc_url.unwrap_or(network.fullnode_url()))?;
        let faucet_url = faucet_url
            .or(network.faucet_url())
            .map(validate_endpoint)
            .transpose()?;

        Ok(Self {
            network,
            rpc_url,
            faucet_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Faucet endpoint, or a config error on networks without one
    pub fn faucet(&self) -> PtbResult<&Url> {
        self.faucet_url
            .as_ref()
            .ok_or_else(|| PtbError::config_error(format!("No faucet available on {}", self.network)))
    }
}

// =============================================================================
// Gas
// =============================================================================

/// Gas defaults; unset values are resolved per transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GasConfig {
    /// Fixed budget in MIST; estimated by dry run when `None`
    pub budget: Option<u64>,
    /// Fixed price in MIST; reference gas price when `None`
    pub price: Option<u64>,
}

// =============================================================================
// Context
// =============================================================================

pub struct ClientContext {
    pub network: NetworkConfig,
    user: Box<dyn KeyPair>,
    sponsor: Option<Box<dyn KeyPair>>,
    pub gas: GasConfig,
}

impl ClientContext {
    pub fn new(network: NetworkConfig, user: Box<dyn KeyPair>) -> Self {
        Self {
            network,
            user,
            sponsor: None,
            gas: GasConfig::default(),
        }
    }

    /// Build from encoded secret keys (base64 or `suiprivkey1...`)
    pub fn from_secrets(
        network: NetworkConfig,
        user_key: &SecretString,
        sponsor_key: Option<&SecretString>,
        gas: GasConfig,
    ) -> PtbResult<Self> {
        let user = Ed25519KeyPair::decode(user_key.expose_secret())
            .map_err(|e| PtbError::invalid_private_key(format!("User key: {}", e.message)))?;
        let sponsor = sponsor_key
            .map(|key| {
                Ed25519KeyPair::decode(key.expose_secret())
                    .map_err(|e| PtbError::invalid_private_key(format!("Sponsor key: {}", e.message)))
            })
            .transpose()?;

        let mut ctx = Self::new(network, Box::new(user)).with_gas(gas);
        if let Some(sponsor) = sponsor {
            ctx = ctx.with_sponsor(Box::new(sponsor));
        }
        Ok(ctx)
    }

    pub fn with_sponsor(mut self, sponsor: Box<dyn KeyPair>) -> Self {
        self.sponsor = Some(sponsor);
        self
    }

    pub fn with_gas(mut self, gas: GasConfig) -> Self {
        self.gas = gas;
        self
    }

    pub fn user(&self) -> &dyn KeyPair {
        self.user.as_ref()
    }

    pub fn user_address(&self) -> SuiAddress {
        self.user.address()
    }

    /// The sponsor key, required by sponsored flows
    pub fn sponsor(&self) -> PtbResult<&dyn KeyPair> {
        self.sponsor
            .as_deref()
            .ok_or_else(|| PtbError::config_error("No sponsor key configured"))
    }

    pub fn rpc_client(&self) -> PtbResult<JsonRpcClient> {
        JsonRpcClient::with_timeout(self.network.rpc_url.as_str(), self.network.timeout)
    }
}

impl fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientContext")
            .field("network", &self.network)
            .field("user", &self.user.address())
            .field("sponsor", &self.sponsor.as_ref().map(|s| s.address()))
            .field("gas", &self.gas)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_KEY: &str = "16/DxkhBCdKkCBOEXsWonMeEM/g8E+IjFZx6EUMlCng=";
    const SPONSOR_KEY: &str = "17/DxkhBCdKkCBOEXsWonMeEM/g8E+IjFZx6EUMlCng=";

    #[test]
    fn test_https_required_for_remote() {
        assert!(validate_endpoint("https://fullnode.testnet.sui.io:443").is_ok());
        assert!(validate_endpoint("http://127.0.0.1:9000").is_ok());
        assert!(validate_endpoint("http://localhost:9000").is_ok());
        assert!(validate_endpoint("http://fullnode.testnet.sui.io").is_err());
        assert!(validate_endpoint("ftp://example.com").is_err());
        assert!(validate_endpoint("not a url").is_err());
    }

    #[test]
    fn test_network_defaults() {
        let config = NetworkConfig::new(Network::Testnet, None, None).unwrap();
        assert_eq!(config.rpc_url.host_str(), Some("fullnode.testnet.sui.io"));
        assert!(config.faucet_url.is_some());

        let mainnet = NetworkConfig::new(Network::Mainnet, None, None).unwrap();
        assert!(mainnet.faucet_url.is_none());
        assert_eq!(mainnet.faucet().unwrap_err().code, crate::error::ErrorCode::ConfigError);

        let custom = NetworkConfig::new(Network::Testnet, Some("http://localhost:9000"), None).unwrap();
        assert_eq!(custom.rpc_url.port(), Some(9000));
    }

    #[test]
    fn test_network_parse() {
        assert_eq!("Devnet".parse::<Network>().unwrap(), Network::Devnet);
        assert_eq!("local".parse::<Network>().unwrap(), Network::Localnet);
        assert!("moonnet".parse::<Network>().is_err());
    }

    #[test]
    fn test_context_from_secrets() {
        let network = NetworkConfig::new(Network::Testnet, None, None).unwrap();
        let user = SecretString::from(USER_KEY.to_string());
        let sponsor = SecretString::from(SPONSOR_KEY.to_string());
        let ctx = ClientContext::from_secrets(network, &user, Some(&sponsor), GasConfig::default()).unwrap();

        assert_eq!(
            ctx.user_address().to_string(),
            "0xe7adfa0df2a0ab8892ebcf2950050bd6906789c709f1defcca2e3b4b120529de"
        );
        assert_eq!(
            ctx.sponsor().unwrap().address().to_string(),
            "0xde741c594107f8b6e0914872b2802b3721304e7fd8dae4648b399b51cd2aea86"
        );
    }

    #[test]
    fn test_missing_sponsor_is_config_error() {
        let network = NetworkConfig::new(Network::Localnet, None, None).unwrap();
        let ctx = ClientContext::new(network, Box::new(Ed25519KeyPair::from_seed(&[1; 32])));
        let err = ctx.sponsor().err().unwrap();
        assert_eq!(err.code, crate::error::ErrorCode::ConfigError);
        assert!(ctx.network.faucet().is_ok());
    }
}
