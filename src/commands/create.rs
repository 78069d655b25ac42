//! Implementation of the `tokenforge create-token` command.

use crate::cli::CreateTokenArgs;
use crate::tasks::{self, TaskPayload};

/// Build the `createToken` payload from command-line flags.
pub fn payload(args: CreateTokenArgs) -> TaskPayload {
    TaskPayload::DirectArgs(tasks::CreateTokenArgs {
        token_name: args.name,
        token_symbol: args.symbol,
        initial_supply: args.supply,
        owner_address: args.owner,
    })
}
