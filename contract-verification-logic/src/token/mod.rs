pub mod balances;
pub mod erc20;

use crate::types::ContractType;
use ethabi::ParamType;

/// Decides which token standard, if any, the compiled abi satisfies.
///
/// The check is structural: every required function and event must be present
/// with the exact parameter and return types, so an unrelated function that
/// happens to share a name does not count towards the standard.
pub fn classify_contract(abi: &ethabi::Contract) -> ContractType {
    if is_erc20(abi) {
        ContractType::Erc20
    } else {
        ContractType::Other
    }
}

fn is_erc20(abi: &ethabi::Contract) -> bool {
    use ParamType::{Address, Bool, Uint};

    has_function(abi, "totalSupply", &[], &[Uint(256)])
        && has_function(abi, "balanceOf", &[Address], &[Uint(256)])
        && has_function(abi, "transfer", &[Address, Uint(256)], &[Bool])
        && has_function(abi, "transferFrom", &[Address, Address, Uint(256)], &[Bool])
        && has_function(abi, "approve", &[Address, Uint(256)], &[Bool])
        && has_function(abi, "allowance", &[Address, Address], &[Uint(256)])
        && has_event(abi, "Transfer", &[Address, Address, Uint(256)])
        && has_event(abi, "Approval", &[Address, Address, Uint(256)])
}

fn has_function(
    abi: &ethabi::Contract,
    name: &str,
    inputs: &[ParamType],
    outputs: &[ParamType],
) -> bool {
    abi.functions.get(name).is_some_and(|overloads| {
        overloads.iter().any(|function| {
            function.inputs.iter().map(|param| &param.kind).eq(inputs)
                && function.outputs.iter().map(|param| &param.kind).eq(outputs)
        })
    })
}

fn has_event(abi: &ethabi::Contract, name: &str, inputs: &[ParamType]) -> bool {
    abi.events.get(name).is_some_and(|overloads| {
        overloads
            .iter()
            .any(|event| event.inputs.iter().map(|param| &param.kind).eq(inputs))
    })
}
