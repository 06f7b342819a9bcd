use crate::error::{MapError, ValidationError};
use crate::models::{MapPoint, Marker, MarkerId, MarkerInput, MarkerType};

/// Identifies one in-flight request so a late response can be matched
/// against the editor that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(pub(crate) u64);

#[derive(Debug, Clone, PartialEq)]
pub enum EditorMode {
    /// Draft with no id yet.
    Create,
    /// Snapshot of the marker being edited.
    Edit(Marker),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorStatus {
    Editing,
    Submitting(RequestTicket),
    Failed(MapError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Create,
    Update,
    Delete,
}

impl RequestKind {
    /// Past-tense summary for notifications.
    pub fn done_message(self) -> &'static str {
        match self {
            RequestKind::Create => "Marker created",
            RequestKind::Update => "Marker updated",
            RequestKind::Delete => "Marker deleted",
        }
    }
}

/// A call the editor wants made against the marker service.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerRequest {
    Create(MarkerInput),
    /// Full-object update.
    Update(Marker),
    Delete(MarkerId),
}

impl MarkerRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            MarkerRequest::Create(_) => RequestKind::Create,
            MarkerRequest::Update(_) => RequestKind::Update,
            MarkerRequest::Delete(_) => RequestKind::Delete,
        }
    }

    pub fn marker_id(&self) -> Option<&MarkerId> {
        match self {
            MarkerRequest::Create(_) => None,
            MarkerRequest::Update(m) => Some(&m.id),
            MarkerRequest::Delete(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub ticket: RequestTicket,
    pub request: MarkerRequest,
}

/// Form state bound to one marker, new or existing.
///
/// The type is held as the raw select value and only parsed on submit, so
/// an unknown value surfaces as a validation error rather than being lost.
/// The position is not editable; it comes from the click that opened the
/// editor or from the existing marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerEditor {
    mode: EditorMode,
    name: String,
    marker_type: String,
    is_friendly: bool,
    position: MapPoint,
    status: EditorStatus,
}

impl MarkerEditor {
    pub fn create(position: MapPoint) -> Self {
        MarkerEditor {
            mode: EditorMode::Create,
            name: String::new(),
            marker_type: MarkerType::Person.as_str().to_string(),
            is_friendly: true,
            position,
            status: EditorStatus::Editing,
        }
    }

    pub fn edit(marker: &Marker) -> Self {
        MarkerEditor {
            mode: EditorMode::Edit(marker.clone()),
            name: marker.name.clone(),
            marker_type: marker.marker_type.as_str().to_string(),
            is_friendly: marker.is_friendly,
            position: marker.position,
            status: EditorStatus::Editing,
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn is_create(&self) -> bool {
        matches!(self.mode, EditorMode::Create)
    }

    /// Id of the marker being edited; `None` for a draft.
    pub fn marker_id(&self) -> Option<&MarkerId> {
        match &self.mode {
            EditorMode::Create => None,
            EditorMode::Edit(m) => Some(&m.id),
        }
    }

    pub fn title(&self) -> &'static str {
        if self.is_create() {
            "New marker"
        } else {
            "Edit marker"
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn marker_type(&self) -> &str {
        &self.marker_type
    }

    pub fn is_friendly(&self) -> bool {
        self.is_friendly
    }

    pub fn position(&self) -> MapPoint {
        self.position
    }

    pub fn status(&self) -> &EditorStatus {
        &self.status
    }

    pub fn error(&self) -> Option<&MapError> {
        match &self.status {
            EditorStatus::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.status, EditorStatus::Submitting(_))
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.clear_validation_error();
    }

    pub fn set_marker_type(&mut self, value: impl Into<String>) {
        self.marker_type = value.into();
        self.clear_validation_error();
    }

    pub fn set_friendly(&mut self, is_friendly: bool) {
        self.is_friendly = is_friendly;
    }

    fn clear_validation_error(&mut self) {
        if matches!(self.status, EditorStatus::Failed(MapError::Validation(_))) {
            self.status = EditorStatus::Editing;
        }
    }

    /// Permission failures stay blocked: resubmitting would fail the same way.
    pub fn can_submit(&self) -> bool {
        !matches!(
            self.status,
            EditorStatus::Submitting(_) | EditorStatus::Failed(MapError::Permission(_))
        )
    }

    pub fn can_delete(&self) -> bool {
        !self.is_create() && self.can_submit()
    }

    pub fn validate(&self) -> Result<MarkerInput, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let marker_type: MarkerType = self.marker_type.parse()?;
        Ok(MarkerInput {
            name: name.to_string(),
            marker_type,
            is_friendly: self.is_friendly,
            position: self.position,
        })
    }

    /// Validate and move to `Submitting`. A validation failure is recorded
    /// on the editor and returned; nothing is sent.
    pub(crate) fn begin_submit(
        &mut self,
        ticket: RequestTicket,
    ) -> Result<Option<PendingRequest>, ValidationError> {
        if !self.can_submit() {
            return Ok(None);
        }
        let input = match self.validate() {
            Ok(input) => input,
            Err(e) => {
                self.status = EditorStatus::Failed(e.clone().into());
                return Err(e);
            }
        };
        let request = match &self.mode {
            EditorMode::Create => MarkerRequest::Create(input),
            EditorMode::Edit(original) => {
                let mut marker = original.clone();
                marker.apply(input);
                MarkerRequest::Update(marker)
            }
        };
        self.status = EditorStatus::Submitting(ticket);
        Ok(Some(PendingRequest { ticket, request }))
    }

    pub(crate) fn begin_delete(&mut self, ticket: RequestTicket) -> Option<PendingRequest> {
        if !self.can_delete() {
            return None;
        }
        let id = self.marker_id()?.clone();
        self.status = EditorStatus::Submitting(ticket);
        Some(PendingRequest {
            ticket,
            request: MarkerRequest::Delete(id),
        })
    }

    pub(crate) fn owns(&self, ticket: RequestTicket) -> bool {
        self.status == EditorStatus::Submitting(ticket)
    }

    pub(crate) fn fail(&mut self, error: MapError) {
        self.status = EditorStatus::Failed(error);
    }
}
