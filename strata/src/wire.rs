// SPDX-License-Identifier: AGPL-3.0-only

//! Persisted binary layout for templates and scored models.
//!
//! All records are `#[repr(C)]` in host byte order (little-endian on every
//! supported target) with explicit padding, so the byte layout is fixed
//! independent of the in-memory [`Model`] type.
//!
//! | Record | Size | Layout |
//! |--------|------|--------|
//! | [`LayerRecord`] | 40 | a, b, c, `volumetric_radius`, density (f64) |
//! | [`TemplateHeader`] | 32 | L (f64), `num_layers` (u32), pad (u32), pad (2×f64) |
//! | template buffer | 32 + 40n | header followed by n packed layers |
//! | [`ModelRecord`] | 832 | L, `num_layers`, pad, 20 layers, `rel_err`, `total_energy` |

use crate::error::StrataError;
use crate::model::{Layer, Model, ModelStats, MAX_LAYERS};
use bytemuck::{Pod, Zeroable};
use std::mem::size_of;

/// One layer as stored.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LayerRecord {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub volumetric_radius: f64,
    pub density: f64,
}

/// Header of a template buffer; packed layers follow at byte 32.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TemplateHeader {
    pub angular_momentum: f64,
    pub num_layers: u32,
    pub _pad0: u32,
    pub _pad1: [f64; 2],
}

/// Fixed-capacity scored model.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ModelRecord {
    pub angular_momentum: f64,
    pub num_layers: u32,
    pub _pad: u32,
    pub layers: [LayerRecord; MAX_LAYERS],
    pub rel_equipotential_err: f64,
    pub total_energy: f64,
}

impl From<&Layer> for LayerRecord {
    fn from(l: &Layer) -> Self {
        Self {
            a: l.a,
            b: l.b,
            c: l.c,
            volumetric_radius: l.volumetric_radius,
            density: l.density,
        }
    }
}

impl From<&LayerRecord> for Layer {
    fn from(r: &LayerRecord) -> Self {
        Self {
            a: r.a,
            b: r.b,
            c: r.c,
            volumetric_radius: r.volumetric_radius,
            density: r.density,
        }
    }
}

fn layer_count(n: usize) -> Result<u32, StrataError> {
    if n > MAX_LAYERS {
        return Err(StrataError::TooManyLayers {
            count: n,
            max: MAX_LAYERS,
        });
    }
    u32::try_from(n).map_err(|_| StrataError::TooManyLayers {
        count: n,
        max: MAX_LAYERS,
    })
}

impl ModelRecord {
    /// Pack a model; statistics other than error and energy are dropped.
    ///
    /// # Errors
    ///
    /// [`StrataError::TooManyLayers`] past the record capacity.
    pub fn from_model(model: &Model) -> Result<Self, StrataError> {
        let mut record = Self::zeroed();
        record.angular_momentum = model.angular_momentum;
        record.num_layers = layer_count(model.layers.len())?;
        for (slot, layer) in record.layers.iter_mut().zip(&model.layers) {
            *slot = LayerRecord::from(layer);
        }
        record.rel_equipotential_err = model.stats.rel_equipotential_err;
        record.total_energy = model.stats.total_energy;
        Ok(record)
    }

    /// Unpack into a model carrying the stored error and energy.
    ///
    /// # Errors
    ///
    /// [`StrataError::RecordLayout`] when `num_layers` exceeds the capacity.
    pub fn to_model(&self) -> Result<Model, StrataError> {
        let n = self.num_layers as usize;
        if n > MAX_LAYERS {
            return Err(StrataError::RecordLayout(format!(
                "record claims {n} layers, capacity is {MAX_LAYERS}"
            )));
        }
        Ok(Model {
            angular_momentum: self.angular_momentum,
            layers: self.layers[..n].iter().map(Layer::from).collect(),
            stats: ModelStats {
                rel_equipotential_err: self.rel_equipotential_err,
                total_energy: self.total_energy,
                ..ModelStats::default()
            },
        })
    }
}

/// Serialize a template: header plus packed layers.
///
/// # Errors
///
/// [`StrataError::TooManyLayers`] past the record capacity.
pub fn encode_template(model: &Model) -> Result<Vec<u8>, StrataError> {
    let header = TemplateHeader {
        angular_momentum: model.angular_momentum,
        num_layers: layer_count(model.layers.len())?,
        _pad0: 0,
        _pad1: [0.0; 2],
    };
    let mut out = Vec::with_capacity(
        size_of::<TemplateHeader>() + model.layers.len() * size_of::<LayerRecord>(),
    );
    out.extend_from_slice(bytemuck::bytes_of(&header));
    for layer in &model.layers {
        out.extend_from_slice(bytemuck::bytes_of(&LayerRecord::from(layer)));
    }
    Ok(out)
}

/// Parse and validate a template buffer.
///
/// # Errors
///
/// [`StrataError::RecordLayout`] on a short or mis-sized buffer; model
/// validation errors for the decoded contents.
pub fn decode_template(bytes: &[u8]) -> Result<Model, StrataError> {
    let header_len = size_of::<TemplateHeader>();
    if bytes.len() < header_len {
        return Err(StrataError::RecordLayout(format!(
            "template buffer is {} bytes, header needs {header_len}",
            bytes.len()
        )));
    }
    let header: TemplateHeader = bytemuck::pod_read_unaligned(&bytes[..header_len]);
    let n = header.num_layers as usize;
    let expected = header_len + n * size_of::<LayerRecord>();
    if bytes.len() != expected {
        return Err(StrataError::RecordLayout(format!(
            "template with {n} layers needs {expected} bytes, got {}",
            bytes.len()
        )));
    }
    let layers = bytes[header_len..]
        .chunks_exact(size_of::<LayerRecord>())
        .map(|chunk| Layer::from(&bytemuck::pod_read_unaligned::<LayerRecord>(chunk)))
        .collect();
    Model::new(header.angular_momentum, layers)
}

/// Serialize models as consecutive [`ModelRecord`]s.
///
/// # Errors
///
/// [`StrataError::TooManyLayers`] for any model past the capacity.
pub fn encode_records(models: &[Model]) -> Result<Vec<u8>, StrataError> {
    let mut out = Vec::with_capacity(models.len() * size_of::<ModelRecord>());
    for model in models {
        out.extend_from_slice(bytemuck::bytes_of(&ModelRecord::from_model(model)?));
    }
    Ok(out)
}

/// Parse consecutive [`ModelRecord`]s.
///
/// # Errors
///
/// [`StrataError::RecordLayout`] when the length is not a whole number of
/// records or a record is malformed.
pub fn decode_records(bytes: &[u8]) -> Result<Vec<Model>, StrataError> {
    let size = size_of::<ModelRecord>();
    if bytes.len() % size != 0 {
        return Err(StrataError::RecordLayout(format!(
            "{} bytes is not a multiple of the {size}-byte model record",
            bytes.len()
        )));
    }
    bytes
        .chunks_exact(size)
        .map(|chunk| bytemuck::pod_read_unaligned::<ModelRecord>(chunk).to_model())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Model {
        Model::new(
            4.01,
            vec![
                Layer::new(0.99, 1.0, 1.01, 1.05),
                Layer::new(1.98, 2.0, 2.02, 2.10),
            ],
        )
        .unwrap()
    }

    #[test]
    fn record_sizes() {
        assert_eq!(size_of::<LayerRecord>(), 40);
        assert_eq!(size_of::<TemplateHeader>(), 32);
        assert_eq!(size_of::<ModelRecord>(), 832);
    }

    #[test]
    fn model_record_byte_positions() {
        let mut m = sample();
        m.stats.rel_equipotential_err = 0.25;
        m.stats.total_energy = -3.5;
        let bytes = encode_records(&[m]).unwrap();
        assert_eq!(&bytes[8..12], &2_u32.to_le_bytes());
        assert_eq!(&bytes[16..24], &0.99_f64.to_le_bytes());
        assert_eq!(&bytes[56..64], &1.98_f64.to_le_bytes());
        assert_eq!(&bytes[816..824], &0.25_f64.to_le_bytes());
        assert_eq!(&bytes[824..832], &(-3.5_f64).to_le_bytes());
    }

    #[test]
    fn template_header_bytes() {
        let bytes = encode_template(&sample()).unwrap();
        assert_eq!(bytes.len(), 32 + 2 * 40);
        assert_eq!(&bytes[0..8], &4.01_f64.to_le_bytes());
        assert_eq!(&bytes[8..12], &2_u32.to_le_bytes());
        assert!(bytes[12..32].iter().all(|&b| b == 0));
        assert_eq!(&bytes[32..40], &0.99_f64.to_le_bytes());
    }

    #[test]
    fn template_decode_restores_layers() {
        let m = sample();
        let back = decode_template(&encode_template(&m).unwrap()).unwrap();
        assert_eq!(back.layers, m.layers);
    }

    #[test]
    fn template_truncated_rejected() {
        let bytes = encode_template(&sample()).unwrap();
        assert!(matches!(
            decode_template(&bytes[..bytes.len() - 1]),
            Err(StrataError::RecordLayout(_))
        ));
        assert!(matches!(decode_template(&bytes[..16]), Err(StrataError::RecordLayout(_))));
    }

    #[test]
    fn model_record_keeps_error_and_energy() {
        let mut m = sample();
        m.stats.rel_equipotential_err = 1.5e-3;
        m.stats.total_energy = -42.0;
        m.stats.score = 7.0;
        let back = decode_records(&encode_records(&[m.clone()]).unwrap()).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].layers, m.layers);
        assert_eq!(back[0].stats.total_energy.to_bits(), (-42.0_f64).to_bits());
        assert_eq!(back[0].stats.score.to_bits(), 0.0_f64.to_bits());
    }

    #[test]
    fn records_reject_partial_buffer() {
        assert!(decode_records(&[0u8; 831]).is_err());
        assert!(decode_records(&[]).unwrap().is_empty());
    }

    #[test]
    fn record_with_bad_layer_count_rejected() {
        let mut r = ModelRecord::from_model(&sample()).unwrap();
        r.num_layers = 21;
        assert!(matches!(r.to_model(), Err(StrataError::RecordLayout(_))));
    }

    #[test]
    fn too_many_layers_for_record() {
        let m = Model {
            angular_momentum: 0.0,
            layers: (1..=21).map(|i| Layer::sphere(f64::from(i), 1.0)).collect(),
            stats: ModelStats::default(),
        };
        assert!(matches!(
            ModelRecord::from_model(&m),
            Err(StrataError::TooManyLayers { count: 21, .. })
        ));
    }
}
