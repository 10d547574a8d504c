// SPDX-License-Identifier: CEPL-1.0
use std::collections::BTreeSet;

use ash::vk;
use bitflags::bitflags;
use serde::Deserialize;

bitflags! {
    /// Queue roles a negotiation asks for.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct QueueRoles: u8 {
        /// A family whose `queue_flags` include GRAPHICS.
        const GRAPHICS = 1 << 0;
        /// A family that can present to the negotiation's surface.
        const PRESENT = 1 << 1;
    }
}

/// Config-file spelling of a single role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueRole {
    Graphics,
    Present,
}

impl From<QueueRole> for QueueRoles {
    fn from(role: QueueRole) -> Self {
        match role {
            QueueRole::Graphics => QueueRoles::GRAPHICS,
            QueueRole::Present => QueueRoles::PRESENT,
        }
    }
}

impl FromIterator<QueueRole> for QueueRoles {
    fn from_iter<I: IntoIterator<Item = QueueRole>>(iter: I) -> Self {
        iter.into_iter()
            .fold(QueueRoles::empty(), |acc, r| acc | QueueRoles::from(r))
    }
}

/// Resolved family index per role. Indices are positions in the driver's
/// queue family enumeration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics: Option<u32>,
    pub present: Option<u32>,
}

impl QueueFamilyIndices {
    /// First-match scan over `families`. Each requested role takes the first
    /// family that satisfies it; the scan stops once every requested role is
    /// resolved, so later families are never considered. `supports_present`
    /// is only called while the present role is still open.
    pub fn resolve<F>(
        families: &[vk::QueueFamilyProperties],
        roles: QueueRoles,
        mut supports_present: F,
    ) -> Self
    where
        F: FnMut(u32) -> bool,
    {
        let mut out = QueueFamilyIndices::default();
        if out.is_complete(roles) {
            return out;
        }

        for (i, family) in families.iter().enumerate() {
            let i = i as u32;

            if roles.contains(QueueRoles::GRAPHICS)
                && out.graphics.is_none()
                && family.queue_flags.contains(vk::QueueFlags::GRAPHICS)
            {
                out.graphics = Some(i);
            }

            if roles.contains(QueueRoles::PRESENT)
                && out.present.is_none()
                && supports_present(i)
            {
                out.present = Some(i);
            }

            if out.is_complete(roles) {
                break;
            }
        }
        out
    }

    /// Requested roles still lacking an index.
    pub fn missing(&self, roles: QueueRoles) -> QueueRoles {
        let mut resolved = QueueRoles::empty();
        resolved.set(QueueRoles::GRAPHICS, self.graphics.is_some());
        resolved.set(QueueRoles::PRESENT, self.present.is_some());
        roles - resolved
    }

    pub fn is_complete(&self, roles: QueueRoles) -> bool {
        self.missing(roles).is_empty()
    }

    /// Both roles resolved to one family.
    pub fn shares_family(&self) -> bool {
        matches!((self.graphics, self.present), (Some(g), Some(p)) if g == p)
    }

    /// One entry per distinct resolved family; this is what queue creation
    /// iterates.
    pub fn unique_families(&self) -> BTreeSet<u32> {
        self.graphics.into_iter().chain(self.present).collect()
    }
}
