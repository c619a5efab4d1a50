//! Script size and operation limits.

use serde::{Deserialize, Serialize};

use crate::opcodes::OP_16;
use crate::script::Script;
use crate::ScriptError;

/// Largest single push accepted by consensus.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;
/// Largest script payload accepted by consensus.
pub const MAX_SCRIPT_SIZE: usize = 10_000;
/// Non-push opcodes allowed in one script.
pub const MAX_OPS_PER_SCRIPT: usize = 201;
/// Most public keys `OP_CHECKMULTISIG` accepts.
pub const MAX_PUBKEYS_PER_MULTISIG: usize = 20;

/// Limits checked by [`Script::check_limits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Largest payload size in bytes.
    pub max_script_size: usize,
    /// Most opcodes above `OP_16`.
    pub max_ops: usize,
    /// Largest single data push.
    pub max_element_size: usize,
    /// Most keys in a bare multisig script.
    pub max_pubkeys_per_multisig: usize,
}

impl Limits {
    /// The consensus limits for legacy and witness v0 scripts.
    pub fn standard() -> Self {
        Limits {
            max_script_size: MAX_SCRIPT_SIZE,
            max_ops: MAX_OPS_PER_SCRIPT,
            max_element_size: MAX_SCRIPT_ELEMENT_SIZE,
            max_pubkeys_per_multisig: MAX_PUBKEYS_PER_MULTISIG,
        }
    }

    /// No limits at all.
    pub fn unlimited() -> Self {
        Limits {
            max_script_size: usize::MAX,
            max_ops: usize::MAX,
            max_element_size: usize::MAX,
            max_pubkeys_per_multisig: usize::MAX,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::standard()
    }
}

impl Script {
    /// Number of counted operations: opcode chunks above `OP_16`.
    pub fn op_count(&self) -> usize {
        self.chunks()
            .iter()
            .filter(|c| !c.is_push() && c.op() > OP_16)
            .count()
    }

    /// Check the script against `limits`, reporting the first one exceeded.
    pub fn check_limits(&self, limits: &Limits) -> Result<(), ScriptError> {
        let size = self.size();
        if size > limits.max_script_size {
            return Err(ScriptError::ScriptTooLarge {
                size,
                max: limits.max_script_size,
            });
        }
        if let Some(len) = self
            .chunks()
            .iter()
            .filter_map(|c| c.data().map(<[u8]>::len))
            .find(|&len| len > limits.max_element_size)
        {
            return Err(ScriptError::ElementTooLarge {
                size: len,
                max: limits.max_element_size,
            });
        }
        let count = self.op_count();
        if count > limits.max_ops {
            return Err(ScriptError::TooManyOps {
                count,
                max: limits.max_ops,
            });
        }
        if let Some((_, n)) = self.multisig_params() {
            if n > limits.max_pubkeys_per_multisig {
                return Err(ScriptError::TooManyPubkeys {
                    count: n,
                    max: limits.max_pubkeys_per_multisig,
                });
            }
        }
        Ok(())
    }
}
