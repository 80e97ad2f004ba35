//! The canonical order a host drives a plugin through its actions.

use tracing::debug;

/// Binary load through instance creation
pub const PREAMBLE: [&str; 4] = [
    "kOfxActionLoad",
    "kOfxActionDescribe",
    "kOfxImageEffectActionDescribeInContext",
    "kOfxActionCreateInstance",
];

/// Editing, clip negotiation and one rendered sequence
pub const RUNTIME: [&str; 13] = [
    "kOfxActionBeginInstanceEdit",
    "kOfxActionBeginInstanceChanged",
    "kOfxActionInstanceChanged",
    "kOfxActionEndInstanceChanged",
    "kOfxImageEffectActionGetClipPreferences",
    "kOfxImageEffectActionGetRegionOfDefinition",
    "kOfxImageEffectActionGetRegionsOfInterest",
    "kOfxImageEffectActionGetFramesNeeded",
    "kOfxImageEffectActionIsIdentity",
    "kOfxImageEffectActionBeginSequenceRender",
    "kOfxImageEffectActionRender",
    "kOfxImageEffectActionEndSequenceRender",
    "kOfxActionEndInstanceEdit",
];

/// Instance teardown through binary unload
pub const CLEANUP: [&str; 4] = [
    "kOfxActionSyncPrivateData",
    "kOfxActionPurgeCaches",
    "kOfxActionDestroyInstance",
    "kOfxActionUnload",
];

pub const DEFAULT_CONTEXT: &str = "filter";

/// Action names in the order a host typically calls them.
///
/// The context is accepted but does not change the sequence: every context
/// gets the same three blocks.
pub fn action_sequence(context: &str) -> Vec<&'static str> {
    debug!(context = %context, "building action sequence");
    PREAMBLE
        .iter()
        .chain(RUNTIME.iter())
        .chain(CLEANUP.iter())
        .copied()
        .collect()
}

/// Position of an action in the canonical sequence
pub fn position(action: &str) -> Option<usize> {
    action_sequence(DEFAULT_CONTEXT)
        .iter()
        .position(|name| *name == action)
}
