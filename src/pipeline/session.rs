//! Editing session state and its transitions.

use crate::core::error::CatalogResult;
use crate::core::types::{ImageValue, Intensity};
use crate::engine::FilterHandle;
use crate::pipeline::catalog::FilterId;
use crate::pipeline::render::{ProcessingPipeline, RenderResult};

/// What the editor remembers between user events.
///
/// Every transition re-renders with whatever state is available; a render is
/// only attempted once both a filter and a source image are present.
#[derive(Debug, Default)]
pub struct SessionState {
    filter: Option<FilterHandle>,
    source: Option<ImageValue>,
    intensity: Intensity,
    displayed: Option<ImageValue>,
}

impl SessionState {
    /// Empty session: no filter, no image, default intensity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session starting with `id` selected and the given slider position.
    ///
    /// An unsupported default leaves the session without a filter.
    pub fn with_default_filter(
        pipeline: &ProcessingPipeline,
        id: FilterId,
        intensity: Intensity,
    ) -> Self {
        let filter = match pipeline.make_filter(id) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("Default filter {} unavailable: {}", id, e);
                None
            }
        };
        Self {
            filter,
            intensity,
            ..Self::default()
        }
    }

    /// Replace the filter with a fresh instance of `id` and re-render.
    ///
    /// On error the current filter is kept and nothing is rendered.
    pub fn select_filter(
        &mut self,
        pipeline: &ProcessingPipeline,
        id: FilterId,
    ) -> CatalogResult<RenderResult> {
        let handle = pipeline.make_filter(id)?;
        log::info!("Selected filter {}", handle.name());
        self.filter = Some(handle);
        Ok(self.render(pipeline))
    }

    /// Set a new source image and re-render.
    pub fn set_image(&mut self, pipeline: &ProcessingPipeline, image: ImageValue) -> RenderResult {
        self.source = Some(image);
        self.render(pipeline)
    }

    /// Move the slider and re-render.
    pub fn set_intensity(&mut self, pipeline: &ProcessingPipeline, value: f64) -> RenderResult {
        self.intensity = Intensity::new(value);
        self.render(pipeline)
    }

    /// Render the current state. A produced image becomes the displayed one.
    pub fn render(&mut self, pipeline: &ProcessingPipeline) -> RenderResult {
        let (Some(handle), Some(source)) = (self.filter.as_mut(), self.source.as_ref()) else {
            log::debug!("Nothing to render yet");
            return RenderResult::None;
        };

        let result = pipeline.render(handle, source, self.intensity);
        if let RenderResult::Image(image) = &result {
            self.displayed = Some(image.clone());
        }
        result
    }

    /// Currently selected filter.
    pub fn filter(&self) -> Option<&FilterHandle> {
        self.filter.as_ref()
    }

    /// Identifier of the currently selected filter.
    pub fn filter_id(&self) -> Option<FilterId> {
        self.filter
            .as_ref()
            .and_then(|handle| FilterId::from_engine_name(handle.name()))
    }

    /// Current source image.
    pub fn source(&self) -> Option<&ImageValue> {
        self.source.as_ref()
    }

    /// Current slider value.
    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    /// Last image shown to the user.
    pub fn displayed(&self) -> Option<&ImageValue> {
        self.displayed.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CatalogError;
    use crate::core::param::ParameterRole;
    use crate::core::types::Value;
    use crate::engine::CpuEngine;
    use crate::filters::builtin::fixtures::gradient;
    use std::sync::Arc;

    fn pipeline() -> ProcessingPipeline {
        ProcessingPipeline::default()
    }

    #[test]
    fn test_no_image_is_a_no_op() {
        let pipeline = pipeline();
        let mut session =
            SessionState::with_default_filter(&pipeline, FilterId::TwirlDistortion, Intensity::default());

        assert_eq!(session.render(&pipeline), RenderResult::None);
        assert_eq!(session.set_intensity(&pipeline, 0.8), RenderResult::None);
        assert!(session.displayed().is_none());
        assert!(session.source().is_none());
        assert!(session
            .filter()
            .unwrap()
            .parameter(ParameterRole::Image)
            .is_none());
    }

    #[test]
    fn test_no_filter_is_a_no_op() {
        let pipeline = pipeline();
        let mut session = SessionState::new();

        assert_eq!(session.set_image(&pipeline, gradient(4, 4)), RenderResult::None);
        assert!(session.displayed().is_none());
        assert!(session.filter_id().is_none());
    }

    #[test]
    fn test_default_filter_then_image_renders() {
        let pipeline = pipeline();
        let mut session =
            SessionState::with_default_filter(&pipeline, FilterId::TwirlDistortion, Intensity::new(0.5));
        assert_eq!(session.filter_id(), Some(FilterId::TwirlDistortion));

        let result = session.set_image(&pipeline, gradient(30, 20));
        assert!(result.is_image());
        assert_eq!(session.displayed(), result.image());
    }

    #[test]
    fn test_intensity_change_rerenders_without_new_image() {
        let pipeline = pipeline();
        let mut session =
            SessionState::with_default_filter(&pipeline, FilterId::GaussianBlur, Intensity::new(0.0));
        session.set_image(&pipeline, gradient(12, 12));

        assert!(session.set_intensity(&pipeline, 0.3).is_image());
        assert_eq!(session.intensity(), Intensity::new(0.3));
        assert_eq!(
            session.filter().unwrap().parameter(ParameterRole::Radius),
            Some(&Value::Float(0.3 * 200.0))
        );
    }

    #[test]
    fn test_switching_filters_does_not_leak_bindings() {
        let pipeline = pipeline();
        let mut session = SessionState::new();
        session.set_image(&pipeline, gradient(10, 10));
        session.set_intensity(&pipeline, 0.9);

        session.select_filter(&pipeline, FilterId::Vignette).unwrap();
        session.set_intensity(&pipeline, 0.2);
        session.select_filter(&pipeline, FilterId::UnsharpMask).unwrap();

        let handle = session.filter().unwrap();
        assert_eq!(handle.name(), "CIUnsharpMask");
        assert_eq!(handle.parameter(ParameterRole::Intensity), Some(&Value::Float(0.2)));
        assert_eq!(handle.parameter(ParameterRole::Radius), Some(&Value::Float(0.2 * 200.0)));
        assert!(handle.parameter(ParameterRole::Center).is_none());
    }

    #[test]
    fn test_unsupported_selection_keeps_current_filter() {
        let mut engine = CpuEngine::new();
        engine.registry_mut().set_enabled("CIPixellate", false);
        let pipeline = ProcessingPipeline::new(Arc::new(engine));

        let mut session =
            SessionState::with_default_filter(&pipeline, FilterId::SepiaTone, Intensity::default());
        session.set_image(&pipeline, gradient(6, 6));
        let shown = session.displayed().cloned();

        let err = session.select_filter(&pipeline, FilterId::Pixellate).unwrap_err();
        assert!(matches!(err, CatalogError::Unsupported { .. }));
        assert_eq!(session.filter_id(), Some(FilterId::SepiaTone));
        assert_eq!(session.displayed().cloned(), shown);
    }

    #[test]
    fn test_unsupported_default_leaves_no_filter() {
        let mut engine = CpuEngine::new();
        engine.registry_mut().set_enabled("CITwirlDistortion", false);
        let pipeline = ProcessingPipeline::new(Arc::new(engine));

        let session =
            SessionState::with_default_filter(&pipeline, FilterId::TwirlDistortion, Intensity::default());
        assert!(session.filter().is_none());
    }
}
