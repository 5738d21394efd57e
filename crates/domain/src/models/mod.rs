//! Domain models for the inventory backend.

pub mod asset;
pub mod assignment;
pub mod directory;
pub mod movement;
pub mod reception;

pub use asset::{
    Asset, AssetCategory, AssetRegistration, AssetRevision, AssetStatus, AssetSummary,
    CategoryDetails, CreateAssetRequest, ListAssetsQuery, ListAssetsResponse, StatusTransition,
    UpdateAssetRequest,
};
pub use assignment::{
    AssignmentView, CreateAssignmentRequest, CurrentAssignment, CurrentHolding,
    CurrentHoldingsQuery, ListAssignmentsResponse, ListCurrentHoldingsResponse,
};
pub use directory::{
    Area, AreaRef, CreateAreaRequest, CreateResponsibleRequest, ListAreasResponse,
    ListResponsiblesResponse, PartyRef, Responsible,
};
pub use movement::{
    ListMovementsQuery, ListMovementsResponse, Movement, MovementAction, NewMovement,
    SYSTEM_ACTOR,
};
pub use reception::{
    CreateReceptionRequest, DeleteReceptionResponse, ListReceptionsResponse, ReceptionMetadata,
    ReceptionView, UpdateReceptionRequest,
};
