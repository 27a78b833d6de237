//! RGB frames to an output session.
//!
//! [`OutputPipeline`] is the usual playout path: resolve the output plan,
//! convert, configure the session when the mode or format changes, attach
//! metadata and push. Conversion runs before the session is touched, so a
//! frame that fails to convert never reaches the hardware.

use sdi_color::RangePolicy;
use sdi_convert::{ConvertConfig, EncodeOptions, OutputPlan, Pattern};
use sdi_core::{ColorMatrix, DisplayMode, Error, RgbView, Sample, WireFormat};
use sdi_hdr::HdrMetadata;
use tracing::{debug, info};

use crate::error::DeviceResult;
use crate::session::{ModeInfo, Session};

/// What the caller asks for; the policy layer fills the gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRequest {
    /// Requested wire format
    pub format: WireFormat,
    /// Matrix override
    pub matrix: Option<ColorMatrix>,
    /// Integer RGB input is narrow range
    pub input_narrow: bool,
    /// Wire codes are narrow range
    pub output_narrow: bool,
    /// Out-of-range input handling
    pub policy: RangePolicy,
    /// HDR metadata; `None` clears any previously attached
    pub hdr: Option<HdrMetadata>,
}

impl Default for FrameRequest {
    fn default() -> Self {
        Self::from(&ConvertConfig::default())
    }
}

impl From<&ConvertConfig> for FrameRequest {
    fn from(cfg: &ConvertConfig) -> Self {
        Self {
            format: cfg.format,
            matrix: cfg.matrix,
            input_narrow: cfg.input_narrow,
            output_narrow: cfg.output_narrow,
            policy: if cfg.strict { RangePolicy::Strict } else { RangePolicy::Clamp },
            hdr: None,
        }
    }
}

impl FrameRequest {
    /// Requests `format` with defaults for everything else.
    pub fn new(format: WireFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    /// Attaches HDR metadata.
    pub fn with_hdr(mut self, hdr: HdrMetadata) -> Self {
        self.hdr = Some(hdr);
        self
    }

    /// Overrides the matrix.
    pub fn with_matrix(mut self, matrix: ColorMatrix) -> Self {
        self.matrix = Some(matrix);
        self
    }
}

/// Output session plus the state needed to avoid renegotiating per frame.
#[derive(Debug)]
pub struct OutputPipeline<S: Session> {
    session: S,
    current: Option<(DisplayMode, WireFormat)>,
}

impl<S: Session> OutputPipeline<S> {
    /// Wraps an output session.
    pub fn new(session: S) -> Self {
        Self {
            session,
            current: None,
        }
    }

    /// The wrapped session.
    pub fn session(&self) -> &S {
        &self.session
    }

    /// The wrapped session, mutably.
    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// Returns the session.
    pub fn into_inner(self) -> S {
        self.session
    }

    /// Converts and pushes one frame. Returns the plan that was used.
    pub fn display_frame<T: Sample>(
        &mut self,
        frame: RgbView<'_, T>,
        mode: DisplayMode,
        request: &FrameRequest,
    ) -> DeviceResult<OutputPlan> {
        let plan = OutputPlan::resolve(mode, request.format, T::KIND, request.matrix);
        if (frame.width(), frame.height()) != mode.dimensions() {
            return Err(Error::invalid_shape(
                frame.width(),
                frame.height(),
                format!("{mode} needs {}x{}", mode.width(), mode.height()),
            )
            .into());
        }

        let opts = EncodeOptions {
            matrix: plan.matrix,
            input_narrow: request.input_narrow,
            output_narrow: request.output_narrow,
            policy: request.policy,
        };
        let wire = sdi_convert::encode(frame, plan.format, &opts)?;

        if self.current != Some((mode, plan.format)) {
            let info = self.configure(mode, plan.format)?;
            info!(%mode, format = %plan.format, width = info.width, height = info.height, "output configured");
        }
        match &request.hdr {
            Some(hdr) => self.session.set_output_hdr_metadata(plan.matrix, hdr)?,
            None => self.session.clear_output_hdr_metadata()?,
        }
        self.session.push_frame(&wire)?;
        debug!(%mode, format = %plan.format, matrix = %plan.matrix, "frame pushed");
        Ok(plan)
    }

    /// Renders `pattern` at the mode's size and displays it.
    pub fn display_pattern(
        &mut self,
        pattern: &Pattern,
        mode: DisplayMode,
        request: &FrameRequest,
    ) -> DeviceResult<OutputPlan> {
        if request.format == WireFormat::Bgra8 {
            let frame = pattern.render::<u8>(mode.width(), mode.height())?;
            return self.display_frame(frame.view(), mode, request);
        }
        let frame = pattern.render::<f32>(mode.width(), mode.height())?;
        self.display_frame(frame.view(), mode, request)
    }

    fn configure(&mut self, mode: DisplayMode, format: WireFormat) -> DeviceResult<ModeInfo> {
        self.current = None;
        let info = self.session.negotiate_mode(mode)?;
        self.session.set_wire_format(format)?;
        self.current = Some((mode, format));
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeviceError;
    use crate::loopback::LoopbackDevice;
    use crate::session::Device;
    use sdi_core::RgbFrame;

    #[test]
    fn test_failed_conversion_never_pushes() {
        let dev = LoopbackDevice::default();
        let mut pipe = OutputPipeline::new(dev.open_output(0).unwrap());
        let mode = DisplayMode::Hd720p50;

        let frame: RgbFrame<u8> = RgbFrame::new(1280, 720).unwrap();
        let request = FrameRequest::new(WireFormat::Rgb10);
        let err = pipe.display_frame(frame.view(), mode, &request).unwrap_err();
        assert!(matches!(err, DeviceError::Convert(Error::UnsupportedSampleType { .. })));

        let small: RgbFrame<f32> = RgbFrame::new(64, 64).unwrap();
        let err = pipe.display_frame(small.view(), mode, &FrameRequest::default()).unwrap_err();
        assert!(matches!(err, DeviceError::Convert(Error::InvalidShape { .. })));

        assert_eq!(dev.frames_pushed(), 0);
        assert_eq!(pipe.session().mode(), None);
    }

    #[test]
    fn test_substitutes_bgra_for_u8() {
        let dev = LoopbackDevice::default();
        let mut pipe = OutputPipeline::new(dev.open_output(0).unwrap());
        let frame: RgbFrame<u8> = RgbFrame::new(720, 576).unwrap();
        let plan = pipe
            .display_frame(frame.view(), DisplayMode::Pal, &FrameRequest::new(WireFormat::Yuv10))
            .unwrap();
        assert_eq!(plan.format, WireFormat::Bgra8);
        assert_eq!(plan.matrix, ColorMatrix::Rec601);
        assert!(plan.substituted);
        assert_eq!(pipe.session().wire_format(), Some(WireFormat::Bgra8));
    }

    #[test]
    fn test_reconfigures_only_on_change() {
        let dev = LoopbackDevice::default();
        let mut pipe = OutputPipeline::new(dev.open_output(0).unwrap());
        let req = FrameRequest::new(WireFormat::Yuv8);
        pipe.display_pattern(&Pattern::Bars, DisplayMode::Hd720p50, &req).unwrap();
        pipe.display_pattern(&Pattern::Bars75, DisplayMode::Hd720p50, &req).unwrap();
        assert_eq!(dev.frames_pushed(), 2);

        let err = pipe
            .display_pattern(&Pattern::Bars, DisplayMode::Ntsc, &FrameRequest::new(WireFormat::Rgb12))
            .unwrap_err();
        assert!(matches!(err, DeviceError::Rejected(_)));
        assert_eq!(dev.frames_pushed(), 2);

        pipe.display_pattern(&Pattern::Bars, DisplayMode::Ntsc, &req).unwrap();
        assert_eq!(pipe.session().mode(), Some(DisplayMode::Ntsc));
    }
}
