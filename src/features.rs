// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The token features published alongside each image.

use serde::{Deserialize, Serialize};

use crate::params::Selection;
use crate::render::RenderMode;

/// The flat feature map the cataloguing platform reads.  The key
/// names are fixed by the platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Features {
    /// Which strategy painted the image.
    #[serde(rename = "Render")]
    pub render: RenderMode,
    /// The gradient pair's name.
    #[serde(rename = "Colour")]
    pub colour: String,
    /// Whether the statistic was averaged per visit.
    #[serde(rename = "RenormaliseDelta")]
    pub renormalise_delta: bool,
}

impl Features {
    /// The features of a run.
    pub fn of(selection: &Selection) -> Features {
        Features {
            render: selection.mode,
            colour: selection.pair.name.clone(),
            renormalise_delta: selection.rescale,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
