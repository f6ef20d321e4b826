use super::definition::FunnelData;
use crate::error::FunnelConversionError;

/// A trait for custom data models that can be converted into a `FunnelData`.
///
/// This is the extension point for loading funnels authored in other formats.
/// The bundled JSON format (`WireFunnel`) implements it as well.
///
/// # Example
///
/// ```rust,no_run
/// use michi::prelude::*;
/// use michi::error::FunnelConversionError;
///
/// struct Step { id: String, video: String }
/// struct Playlist { steps: Vec<Step> }
///
/// impl IntoFunnel for Playlist {
///     fn into_funnel(self) -> std::result::Result<FunnelData, FunnelConversionError> {
///         if self.steps.is_empty() {
///             return Err(FunnelConversionError::ValidationError(
///                 "a playlist needs at least one step".to_string(),
///             ));
///         }
///         let mut nodes = vec![FunnelNode {
///             id: "start".to_string(),
///             kind: NodeKind::Start,
///             next_nodes: Default::default(),
///         }];
///         let mut node_order = vec!["start".to_string()];
///         for step in self.steps {
///             node_order.push(step.id.clone());
///             nodes.push(FunnelNode {
///                 id: step.id,
///                 kind: NodeKind::Video(VideoNode {
///                     video_url: Some(step.video),
///                     ..Default::default()
///                 }),
///                 next_nodes: Default::default(),
///             });
///         }
///         Ok(FunnelData { name: "playlist".to_string(), nodes, edges: vec![], node_order })
///     }
/// }
/// ```
pub trait IntoFunnel {
    /// Consumes the object and converts it into a funnel definition.
    fn into_funnel(self) -> Result<FunnelData, FunnelConversionError>;
}

impl IntoFunnel for FunnelData {
    fn into_funnel(self) -> Result<FunnelData, FunnelConversionError> {
        Ok(self)
    }
}
