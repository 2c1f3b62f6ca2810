//! Location editor
//!
//! The create/edit forms keep a [`LocationDraft`]. Picking places and dragging
//! markers only ever touch the draft; nothing reaches a stored posting until
//! [`LocationDraft::commit`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geo::Coordinates,
    postings::{EndpointKind, Location, PostingError},
};

/// Errors raised by the location editor.
#[derive(Debug, Error, PartialEq)]
pub enum EditorError {
    /// Map interactions were requested without an interactive map.
    #[error("the map is unavailable; enter the address as text")]
    MapUnavailable,

    /// The endpoint has no location to drag yet.
    #[error("no {0} location to move")]
    MissingEndpoint(EndpointKind),

    /// Every posting needs an origin.
    #[error("an origin address is required")]
    MissingOrigin,

    /// The address failed validation.
    #[error(transparent)]
    Invalid(#[from] PostingError),
}

/// What the client map can do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MapCapability {
    /// Full map with autocomplete and draggable markers.
    Interactive {
        /// Browser key for the map provider.
        api_key: String,
    },

    /// Plain text address inputs.
    TextOnly,
}

impl MapCapability {
    /// Resolve from the stored credential; absent or blank degrades to
    /// [`MapCapability::TextOnly`].
    pub fn from_credential(api_key: Option<&str>) -> Self {
        match api_key.map(str::trim) {
            Some(key) if !key.is_empty() => Self::Interactive {
                api_key: key.to_string(),
            },
            _ => Self::TextOnly,
        }
    }

    /// Whether markers can be placed and dragged.
    pub const fn is_interactive(&self) -> bool {
        matches!(self, Self::Interactive { .. })
    }
}

/// Committed result of a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftLocations {
    /// Origin
    pub origin: Location,

    /// Destination, if given.
    pub destination: Option<Location>,
}

/// Unsaved origin/destination of a posting form.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationDraft {
    capability: MapCapability,
    origin: Option<Location>,
    destination: Option<Location>,
    dirty: bool,
}

impl LocationDraft {
    /// Empty draft for a new posting.
    pub const fn new(capability: MapCapability) -> Self {
        Self {
            capability,
            origin: None,
            destination: None,
            dirty: false,
        }
    }

    /// Draft seeded from a stored posting.
    pub const fn editing(
        capability: MapCapability,
        origin: Location,
        destination: Option<Location>,
    ) -> Self {
        Self {
            capability,
            origin: Some(origin),
            destination,
            dirty: false,
        }
    }

    /// Map capability the draft was opened with.
    pub const fn capability(&self) -> &MapCapability {
        &self.capability
    }

    /// Current draft for one endpoint.
    pub fn endpoint(&self, kind: EndpointKind) -> Option<&Location> {
        match kind {
            EndpointKind::Origin => self.origin.as_ref(),
            EndpointKind::Destination => self.destination.as_ref(),
        }
    }

    /// Whether the draft differs from what it was opened with.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Type an address. Any previously resolved place is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Invalid`] for a blank address.
    pub fn type_address(
        &mut self,
        kind: EndpointKind,
        address: impl Into<String>,
    ) -> Result<(), EditorError> {
        let location = Location::from_address(address)?;

        *self.slot(kind) = Some(location);
        self.dirty = true;

        Ok(())
    }

    /// Remove an endpoint (only the destination is optional at commit).
    pub fn clear(&mut self, kind: EndpointKind) {
        if self.slot(kind).take().is_some() {
            self.dirty = true;
        }
    }

    /// Accept an autocomplete suggestion with resolved coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::MapUnavailable`] in text-only mode.
    pub fn pick_place(&mut self, kind: EndpointKind, place: Location) -> Result<(), EditorError> {
        self.require_map()?;

        *self.slot(kind) = Some(place);
        self.dirty = true;

        Ok(())
    }

    /// Move a marker; only the draft coordinates change.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::MapUnavailable`] in text-only mode and
    /// [`EditorError::MissingEndpoint`] if there is nothing to move.
    pub fn drag(&mut self, kind: EndpointKind, to: Coordinates) -> Result<(), EditorError> {
        self.require_map()?;

        let location = self
            .slot(kind)
            .as_mut()
            .ok_or(EditorError::MissingEndpoint(kind))?;

        location.coordinates = Some(to);
        self.dirty = true;

        Ok(())
    }

    /// Produce the locations to persist and mark the draft clean.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::MissingOrigin`] without an origin.
    pub fn commit(&mut self) -> Result<DraftLocations, EditorError> {
        let origin = self.origin.clone().ok_or(EditorError::MissingOrigin)?;

        self.dirty = false;

        Ok(DraftLocations {
            origin,
            destination: self.destination.clone(),
        })
    }

    fn require_map(&self) -> Result<(), EditorError> {
        if self.capability.is_interactive() {
            Ok(())
        } else {
            Err(EditorError::MapUnavailable)
        }
    }

    fn slot(&mut self, kind: EndpointKind) -> &mut Option<Location> {
        match kind {
            EndpointKind::Origin => &mut self.origin,
            EndpointKind::Destination => &mut self.destination,
        }
    }
}
