//! Biometric sample-point export.
//!
//! Works on the raw samples, not the fitted curves. Coordinates become
//! millimetre offsets from the first sample with the Y axis pointing up,
//! and every point carries its finite-difference velocity, the elapsed time
//! since the previous sample and a 16-bit pressure value.

use chrono::{DateTime, SecondsFormat};
use inkpad_config::SurfaceConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ExportError;
use crate::constants::{CSS_PIXELS_PER_INCH, MM_PER_INCH, PRESSURE_FULL_SCALE};
use crate::types::{Sample, StrokeDocument};

/// Channels in the order of the inclusion-field bitmask, most significant bit first
const CHANNEL_ORDER: [Channel; 16] = [
    Channel::X,
    Channel::Y,
    Channel::Z,
    Channel::VelocityX,
    Channel::VelocityY,
    Channel::AccelerationX,
    Channel::AccelerationY,
    Channel::Time,
    Channel::DeltaTime,
    Channel::Force,
    Channel::Switch,
    Channel::TiltX,
    Channel::TiltY,
    Channel::Azimuth,
    Channel::Elevation,
    Channel::Rotation,
];

/// Channels this exporter fills in
const POPULATED_CHANNELS: [Channel; 6] = [
    Channel::X,
    Channel::Y,
    Channel::VelocityX,
    Channel::VelocityY,
    Channel::DeltaTime,
    Channel::Force,
];

/// Milliseconds per `DTChannel` unit
const DT_SCALING_VALUE: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    X,
    Y,
    Z,
    VelocityX,
    VelocityY,
    AccelerationX,
    AccelerationY,
    Time,
    DeltaTime,
    Force,
    Switch,
    TiltX,
    TiltY,
    Azimuth,
    Elevation,
    Rotation,
}

/// Hex code of the 16-bit mask of populated channels
fn inclusion_field(channels: &[Channel]) -> String {
    let mask = CHANNEL_ORDER
        .iter()
        .enumerate()
        .filter(|(_, channel)| channels.contains(channel))
        .fold(0u16, |mask, (bit, _)| mask | (0x8000 >> bit));
    format!("{mask:04X}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegistryId {
    pub organization: u16,
    pub identifier: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CaptureDevice {
    #[serde(rename = "DeviceID")]
    pub device_id: RegistryId,
    pub device_technology: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Quality {
    pub algorithm: RegistryId,
    pub quality_calculation_failed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChannelDescription {
    pub scaling_value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDescriptionList {
    #[serde(rename = "DTChannelDescription")]
    pub dt_channel_description: ChannelDescription,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PenTipCoord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PenTipVelocity {
    pub velocity_x: f64,
    pub velocity_y: f64,
}

/// One exported sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    #[serde(rename = "PenTipCoord")]
    pub pen_tip_coord: PenTipCoord,
    #[serde(rename = "PenTipVelocity")]
    pub pen_tip_velocity: PenTipVelocity,
    /// Milliseconds since the previous sample
    #[serde(rename = "DTChannel")]
    pub dt_channel: u64,
    /// Pressure scaled to 0..=65535
    #[serde(rename = "FChannel")]
    pub f_channel: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SamplePointList {
    pub sample_point: Vec<SamplePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Representation {
    pub capture_date_and_time: String,
    pub capture_device: CaptureDevice,
    pub quality_list: Vec<Quality>,
    pub inclusion_field: String,
    pub channel_description_list: ChannelDescriptionList,
    pub sample_point_list: SamplePointList,
}

/// Complete biometric record of a stroke document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BiometricDocument {
    pub version: Version,
    pub representation: Representation,
}

impl BiometricDocument {
    pub fn sample_points(&self) -> &[SamplePoint] {
        &self.representation.sample_point_list.sample_point
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// ISO-8601 UTC timestamp with milliseconds for a time in epoch milliseconds
fn iso_timestamp(time_ms: u64) -> String {
    let datetime = i64::try_from(time_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default();
    datetime.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn pressure_channel(pressure: f64) -> u16 {
    (pressure.clamp(0.0, 1.0) * PRESSURE_FULL_SCALE).round() as u16
}

/// Converts pixel samples into millimetre sample points
struct SampleScaler {
    mm_per_pixel: f64,
    origin: Sample,
    previous: Option<(Sample, PenTipCoord)>,
}

impl SampleScaler {
    fn new(origin: Sample, surface: &SurfaceConfig) -> Self {
        Self {
            mm_per_pixel: MM_PER_INCH / (CSS_PIXELS_PER_INCH * surface.device_pixel_ratio),
            origin,
            previous: None,
        }
    }

    fn point(&mut self, sample: &Sample) -> SamplePoint {
        let coord = PenTipCoord {
            x: (sample.x - self.origin.x) * self.mm_per_pixel,
            y: (self.origin.y - sample.y) * self.mm_per_pixel,
            z: 0.0,
        };

        let (dt, velocity) = match self.previous {
            None => (
                0,
                PenTipVelocity {
                    velocity_x: 0.0,
                    velocity_y: 0.0,
                },
            ),
            Some((previous, previous_coord)) => {
                let dt = sample.time.saturating_sub(previous.time);
                let velocity = if dt == 0 {
                    PenTipVelocity {
                        velocity_x: 0.0,
                        velocity_y: 0.0,
                    }
                } else {
                    PenTipVelocity {
                        velocity_x: (coord.x - previous_coord.x) / dt as f64,
                        velocity_y: (coord.y - previous_coord.y) / dt as f64,
                    }
                };
                (dt, velocity)
            }
        };

        self.previous = Some((*sample, coord));

        SamplePoint {
            pen_tip_coord: coord,
            pen_tip_velocity: velocity,
            dt_channel: dt,
            f_channel: pressure_channel(sample.pressure),
        }
    }
}

/// Build the biometric record of `document`
///
/// Returns `None` when the document holds no samples.
pub fn to_biometric(document: &StrokeDocument, surface: &SurfaceConfig) -> Option<BiometricDocument> {
    let origin = *document.samples().next()?;
    let mut scaler = SampleScaler::new(origin, surface);
    let sample_point: Vec<SamplePoint> = document.samples().map(|s| scaler.point(s)).collect();

    debug!("to_biometric: exported {} sample points", sample_point.len());

    Some(BiometricDocument {
        version: Version { major: 1, minor: 0 },
        representation: Representation {
            capture_date_and_time: iso_timestamp(origin.time),
            capture_device: CaptureDevice {
                device_id: RegistryId {
                    organization: 0,
                    identifier: 0,
                },
                device_technology: "Unknown".to_string(),
            },
            quality_list: vec![Quality {
                algorithm: RegistryId {
                    organization: 0,
                    identifier: 0,
                },
                quality_calculation_failed: true,
            }],
            inclusion_field: inclusion_field(&POPULATED_CHANNELS),
            channel_description_list: ChannelDescriptionList {
                dt_channel_description: ChannelDescription {
                    scaling_value: DT_SCALING_VALUE,
                },
            },
            sample_point_list: SamplePointList { sample_point },
        },
    })
}
