// Torque packet segmentation
use std::ops::Range;

/// One torque sample tagged with its absolute position in the event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Packet {
    pub index: usize,
    pub torque: f64,
}

/// Sample range covered by one stroke segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketSegment {
    pub number: usize,
    pub start: usize,
    pub len: usize,
}

impl PacketSegment {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SegmentationError {
    #[error("Invalid packet length: exceeds torqueData length.")]
    InvalidPacketLength {
        segment: usize,
        cursor: usize,
        length: usize,
        available: usize,
    },
}

/// Validate `record_lengths` against the sample count and return each
/// segment's range. Stops at the first segment running past the data.
pub fn segment_ranges(
    sample_count: usize,
    record_lengths: &[usize],
) -> Result<Vec<PacketSegment>, SegmentationError> {
    let mut segments = Vec::with_capacity(record_lengths.len());
    let mut cursor = 0usize;

    for (number, &length) in record_lengths.iter().enumerate() {
        let end = cursor
            .checked_add(length)
            .filter(|end| *end <= sample_count)
            .ok_or(SegmentationError::InvalidPacketLength {
                segment: number,
                cursor,
                length,
                available: sample_count,
            })?;

        segments.push(PacketSegment {
            number,
            start: cursor,
            len: length,
        });
        cursor = end;
    }

    Ok(segments)
}

/// Packets covering `segments`, which must come from `segment_ranges` over
/// the same `torque_data`
pub fn packets_from_segments(torque_data: &[f64], segments: &[PacketSegment]) -> Vec<Packet> {
    segments
        .iter()
        .flat_map(|segment| segment.range())
        .map(|index| Packet {
            index,
            torque: torque_data[index],
        })
        .collect()
}

/// Split a flat torque array into packets following `record_lengths`.
///
/// Packets come out segment by segment in input order, each tagged with its
/// absolute sample index. Samples past the last segment are not emitted.
pub fn segment_samples(
    torque_data: &[f64],
    record_lengths: &[usize],
) -> Result<Vec<Packet>, SegmentationError> {
    let segments = segment_ranges(torque_data.len(), record_lengths)?;
    let packets = packets_from_segments(torque_data, &segments);

    let dropped = torque_data.len() - packets.len();
    if dropped > 0 {
        tracing::warn!(
            "Record lengths cover {} of {} torque samples, dropping {} trailing samples",
            packets.len(),
            torque_data.len(),
            dropped
        );
    }

    Ok(packets)
}
