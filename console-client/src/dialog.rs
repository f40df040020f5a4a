//! Membership dialog flow.
//!
//! `Closed -> ListOpen -> AddOpen -> ListOpen -> Closed`. Cancel returns to
//! `Closed` from anywhere without side effects.

use console_core::NamespaceId;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MembershipDialog {
    #[default]
    Closed,
    /// Member list of a namespace.
    ListOpen { namespace: NamespaceId },
    /// Candidate picker on top of the member list.
    AddOpen { namespace: NamespaceId },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    #[error("Cannot {action} while the dialog is {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
    #[error("Namespace not found: {0}")]
    UnknownNamespace(NamespaceId),
}

impl MembershipDialog {
    pub fn state_name(&self) -> &'static str {
        match self {
            MembershipDialog::Closed => "closed",
            MembershipDialog::ListOpen { .. } => "showing members",
            MembershipDialog::AddOpen { .. } => "picking a member",
        }
    }

    /// Namespace the dialog is bound to, if open.
    pub fn namespace(&self) -> Option<&NamespaceId> {
        match self {
            MembershipDialog::Closed => None,
            MembershipDialog::ListOpen { namespace } | MembershipDialog::AddOpen { namespace } => {
                Some(namespace)
            }
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, MembershipDialog::Closed)
    }

    pub fn open_members(&mut self, namespace: NamespaceId) -> Result<(), DialogError> {
        match self {
            MembershipDialog::Closed => {
                *self = MembershipDialog::ListOpen { namespace };
                Ok(())
            }
            _ => Err(self.invalid("open the member list")),
        }
    }

    pub fn open_picker(&mut self) -> Result<(), DialogError> {
        match self {
            MembershipDialog::ListOpen { namespace } => {
                let namespace = namespace.clone();
                *self = MembershipDialog::AddOpen { namespace };
                Ok(())
            }
            _ => Err(self.invalid("open the member picker")),
        }
    }

    pub fn back_to_list(&mut self) -> Result<(), DialogError> {
        match self {
            MembershipDialog::AddOpen { namespace } => {
                let namespace = namespace.clone();
                *self = MembershipDialog::ListOpen { namespace };
                Ok(())
            }
            _ => Err(self.invalid("return to the member list")),
        }
    }

    pub fn cancel(&mut self) {
        *self = MembershipDialog::Closed;
    }

    fn invalid(&self, action: &'static str) -> DialogError {
        DialogError::InvalidTransition {
            state: self.state_name(),
            action,
        }
    }
}
