//! Scoped editor action bracket
//!
//! Every mutation goes through an [`ActionTransaction`]. Opening calls the
//! host's `begin_action`, and the matching `end_action` runs exactly once when
//! the guard is closed or dropped, whichever comes first. Early returns with
//! `?` and native failures therefore still close the bracket.
//!
//! The guard holds the unique borrow of the API for its whole lifetime, so a
//! second transaction cannot be opened while one is live.

use std::ops::{Deref, DerefMut};
use tracing::{debug, warn};

use crate::error::{BridgeError, Result};
use crate::host::WorldEditorApi;

pub struct ActionTransaction<'a> {
    api: &'a mut dyn WorldEditorApi,
    label: String,
    open: bool,
}

impl<'a> ActionTransaction<'a> {
    /// Open a bracket labelled `label` in the host's undo history
    pub fn open(api: &'a mut dyn WorldEditorApi, label: &str) -> Result<Self> {
        if !api.begin_action(label) {
            return Err(BridgeError::NativeRejected(format!(
                "BeginEntityAction returned false for: {}",
                label
            )));
        }

        debug!("Opened editor action '{}'", label);
        Ok(Self {
            api,
            label: label.to_string(),
            open: true,
        })
    }

    /// Close the bracket now
    pub fn close(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;

        if self.api.end_action() {
            debug!("Closed editor action '{}'", self.label);
        } else {
            warn!("EndEntityAction returned false for '{}'", self.label);
        }
    }
}

impl<'a> Deref for ActionTransaction<'a> {
    type Target = dyn WorldEditorApi + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.api
    }
}

impl<'a> DerefMut for ActionTransaction<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.api
    }
}

impl Drop for ActionTransaction<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}
