use crate::engines::generation::genome::Genome;
use crate::error::{Result, TuneError};
use crate::space::{ParamKind, ParameterSpace};
use crate::types::{Configuration, ParamValue};

/// Outcome of decoding a genome.
///
/// Decoding never fails for a correct-length genome: every bit pattern is
/// defined to produce either a valid configuration or the explicit
/// not-configurable sentinel (when cross-field validity rules reject the
/// combination).
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Configured(Configuration),
    NotConfigurable(&'static str),
}

impl Decoded {
    pub fn configuration(self) -> Option<Configuration> {
        match self {
            Decoded::Configured(config) => Some(config),
            Decoded::NotConfigurable(_) => None,
        }
    }

    pub fn is_configurable(&self) -> bool {
        matches!(self, Decoded::Configured(_))
    }
}

/// Bit-offset and width of one spec within the genome
#[derive(Debug, Clone, Copy)]
struct FieldLayout {
    offset: usize,
    width: usize,
}

/// Converts between bit-string genomes and hyperparameter configurations.
///
/// The layout (one contiguous bit-slice per spec, in declaration order) is
/// computed once at construction and read-only afterwards; building twice from
/// the same space yields the same layout.
///
/// Field interpretation:
/// - categorical: slice value modulo the domain size indexes the ordered domain
/// - integer range: slice value mapped linearly onto [min, max], rounded, clamped
/// - float range: slice value mapped linearly onto [min, max], clamped
/// - flag: any nonzero slice is true
///
/// All-zero and all-one slices land exactly on the domain boundaries, so no
/// bit pattern can decode past the declared bounds.
#[derive(Debug, Clone)]
pub struct HyperparameterCodec {
    space: ParameterSpace,
    layout: Vec<FieldLayout>,
    genome_length: usize,
}

impl HyperparameterCodec {
    pub fn new(space: ParameterSpace) -> Result<Self> {
        space.validate()?;

        let mut layout = Vec::with_capacity(space.specs().len());
        let mut offset = 0;
        for spec in space.specs() {
            let width = spec.width();
            layout.push(FieldLayout { offset, width });
            offset += width;
        }

        Ok(Self {
            space,
            layout,
            genome_length: offset,
        })
    }

    pub fn space(&self) -> &ParameterSpace {
        &self.space
    }

    /// Total genome bits, fixed for the life of the codec
    pub fn genome_length(&self) -> usize {
        self.genome_length
    }

    /// Decode a genome into a configuration, or the not-configurable sentinel.
    ///
    /// A genome of the wrong length is caller misuse and reported as `Err`;
    /// it is not a decode outcome.
    pub fn decode(&self, genome: &Genome) -> Result<Decoded> {
        if genome.len() != self.genome_length {
            return Err(TuneError::Encoding(format!(
                "genome length {} does not match layout length {}",
                genome.len(),
                self.genome_length
            )));
        }

        let mut config = Configuration::new();

        for (spec, field) in self.space.specs().iter().zip(&self.layout) {
            let raw = read_bits(genome, field.offset, field.width);
            let max_raw = max_raw(field.width);

            let value = match spec.kind {
                ParamKind::Categorical(domain) => {
                    let idx = (raw % domain.len() as u64) as usize;
                    ParamValue::Str(domain[idx].to_string())
                }
                ParamKind::IntRange { min, max, .. } => {
                    let span = (max - min) as f64;
                    let v = min + (raw as f64 / max_raw as f64 * span).round() as i64;
                    ParamValue::Int(v.clamp(min, max))
                }
                ParamKind::FloatRange { min, max, .. } => {
                    let v = min + raw as f64 / max_raw as f64 * (max - min);
                    ParamValue::Float(v.clamp(min, max))
                }
                ParamKind::Flag => ParamValue::Bool(raw != 0),
            };
            config.set(spec.name, value);
        }

        for rule in self.space.rules() {
            if let Err(reason) = rule(&config) {
                log::debug!("genome decodes to an invalid combination: {reason}");
                return Ok(Decoded::NotConfigurable(reason));
            }
        }

        Ok(Decoded::Configured(config))
    }

    /// Encode a configuration as a genome.
    ///
    /// Exact for categorical and flag fields; numeric fields snap to the
    /// nearest point on the discretization grid, so `decode(encode(c))` agrees
    /// with `c` within one discretization step.
    pub fn encode(&self, config: &Configuration) -> Result<Genome> {
        let mut genome = vec![0u8; self.genome_length];

        for (spec, field) in self.space.specs().iter().zip(&self.layout) {
            let max_raw = max_raw(field.width);

            let raw = match spec.kind {
                ParamKind::Categorical(domain) => {
                    let value = config.get_str(spec.name).ok_or_else(|| {
                        TuneError::Encoding(format!("missing categorical field '{}'", spec.name))
                    })?;
                    domain
                        .iter()
                        .position(|candidate| *candidate == value)
                        .ok_or_else(|| {
                            TuneError::Encoding(format!(
                                "value '{value}' is not in the domain of '{}'",
                                spec.name
                            ))
                        })? as u64
                }
                ParamKind::IntRange { min, max, .. } => {
                    let v = config.get_int(spec.name).ok_or_else(|| {
                        TuneError::Encoding(format!("missing integer field '{}'", spec.name))
                    })?;
                    let v = v.clamp(min, max);
                    if max == min {
                        0
                    } else {
                        let fraction = (v - min) as f64 / (max - min) as f64;
                        (fraction * max_raw as f64).round() as u64
                    }
                }
                ParamKind::FloatRange { min, max, .. } => {
                    let v = config.get_float(spec.name).ok_or_else(|| {
                        TuneError::Encoding(format!("missing float field '{}'", spec.name))
                    })?;
                    let fraction = (v.clamp(min, max) - min) / (max - min);
                    (fraction * max_raw as f64).round() as u64
                }
                ParamKind::Flag => {
                    let v = config.get_bool(spec.name).ok_or_else(|| {
                        TuneError::Encoding(format!("missing boolean field '{}'", spec.name))
                    })?;
                    u64::from(v)
                }
            };

            write_bits(&mut genome, field.offset, field.width, raw.min(max_raw));
        }

        Ok(genome)
    }
}

/// Largest raw value representable in `width` bits
fn max_raw(width: usize) -> u64 {
    (1u64 << width) - 1
}

/// Read a bit-slice as an unsigned value, most-significant bit first
fn read_bits(genome: &[u8], offset: usize, width: usize) -> u64 {
    genome[offset..offset + width]
        .iter()
        .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit != 0))
}

/// Write an unsigned value into a bit-slice, most-significant bit first
fn write_bits(genome: &mut [u8], offset: usize, width: usize, value: u64) {
    for i in 0..width {
        let bit = (value >> (width - 1 - i)) & 1;
        genome[offset + i] = bit as u8;
    }
}
