//! Tier merging and `.env` write-back.

use super::environment::Environment;
use super::request::{
    DEFAULT_INITIAL_SUPPLY, DEFAULT_TOKEN_NAME, DEFAULT_TOKEN_SYMBOL, DeploymentRequest, Owner,
    RequestFields,
};
use crate::envfile::{EnvStore, INITIAL_SUPPLY_KEY, TOKEN_NAME_KEY, TOKEN_SYMBOL_KEY};
use crate::error::{Result, TokenforgeError};

/// Merge the tiers into a validated request.
///
/// Precedence per field: `args` > `file` > `env` > fallback. The owner falls
/// back to the deployer account, which exists only when `deployer_available`.
pub fn resolve(
    file: &RequestFields,
    env: &RequestFields,
    args: &RequestFields,
    deployer_available: bool,
) -> Result<DeploymentRequest> {
    let tiers = [
        args.clone().normalized(),
        file.clone().normalized(),
        env.clone().normalized(),
    ];

    let name = first(&tiers, |t| t.name.clone()).unwrap_or_else(|| DEFAULT_TOKEN_NAME.into());
    let symbol =
        first(&tiers, |t| t.symbol.clone()).unwrap_or_else(|| DEFAULT_TOKEN_SYMBOL.into());
    let initial_supply = first(&tiers, |t| t.initial_supply).unwrap_or(DEFAULT_INITIAL_SUPPLY);

    let owner = match first(&tiers, |t| t.owner_address.clone()) {
        Some(address) => Owner::Address(address),
        None if deployer_available => Owner::Deployer,
        None => {
            return Err(TokenforgeError::ConfigMissing(
                "no owner address was given and no deployer account is configured.\n\
                 Pass an owner address or set the signing key in .env."
                    .to_string(),
            ));
        }
    };

    let request = DeploymentRequest {
        name,
        symbol,
        initial_supply,
        owner,
    };
    request.validate()?;
    Ok(request)
}

fn first<T>(tiers: &[RequestFields], pick: impl Fn(&RequestFields) -> Option<T>) -> Option<T> {
    tiers.iter().find_map(pick)
}

/// Resolves requests against a project's persisted and environment tiers.
#[derive(Debug)]
pub struct ConfigResolver<'a> {
    store: &'a EnvStore,
    environment: &'a Environment,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(store: &'a EnvStore, environment: &'a Environment) -> Self {
        Self { store, environment }
    }

    /// Resolve `args` and persist the result as the new defaults.
    ///
    /// The `.env` file is read and rewritten inside one locked transaction.
    /// When resolution fails the transaction is dropped and the file is left
    /// as it was. The owner is never written back.
    pub fn resolve_and_persist(
        &self,
        args: &RequestFields,
        deployer_available: bool,
    ) -> Result<DeploymentRequest> {
        let mut tx = self.store.begin("resolve")?;

        let file = RequestFields::from_env_file(tx.file());
        let env = RequestFields::from_environment(self.environment);
        let request = resolve(&file, &env, args, deployer_available)?;

        tx.set(TOKEN_NAME_KEY, &request.name);
        tx.set(TOKEN_SYMBOL_KEY, &request.symbol);
        tx.set(INITIAL_SUPPLY_KEY, &request.initial_supply.to_string());
        tx.commit()?;

        Ok(request)
    }
}
