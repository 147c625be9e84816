//! The per-interface push buffer.

use braid_core::{Point, PushError, Rank, Timestep};
use indexmap::IndexMap;

use crate::frame::CommitFrame;
use crate::value::TaggedValue;

/// Mutable multiset of tagged values awaiting the next commit.
///
/// Owned exclusively by one interface; never visible to peers. Tags are
/// created lazily on first push and kept in first-push order. Duplicate
/// points under one tag are legal and all retained.
#[derive(Debug)]
pub struct PushBuffer {
    dimensions: usize,
    tags: IndexMap<String, Vec<TaggedValue>>,
    len: usize,
}

impl PushBuffer {
    /// Create an empty buffer accepting points of `dimensions` coordinates.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            tags: IndexMap::new(),
            len: 0,
        }
    }

    /// Dimensionality every pushed point must have.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Buffer one value under `tag`.
    pub fn push(&mut self, tag: &str, point: Point, value: f64) -> Result<(), PushError> {
        self.check_tag(tag)?;
        self.check_point(&point)?;
        self.entry(tag).push(TaggedValue::new(point, value));
        self.len += 1;
        Ok(())
    }

    /// Buffer `points[i]` with `values[i]` under `tag`.
    ///
    /// All points are validated before any is buffered, so a failed call
    /// leaves the buffer unchanged.
    pub fn push_many(&mut self, tag: &str, points: &[Point], values: &[f64]) -> Result<(), PushError> {
        self.check_tag(tag)?;
        if points.len() != values.len() {
            return Err(PushError::LengthMismatch {
                points: points.len(),
                values: values.len(),
            });
        }
        for point in points {
            self.check_point(point)?;
        }
        let entry = self.entry(tag);
        entry.reserve(points.len());
        entry.extend(
            points
                .iter()
                .zip(values)
                .map(|(p, &v)| TaggedValue::new(p.clone(), v)),
        );
        self.len += points.len();
        Ok(())
    }

    /// Total number of buffered values across all tags.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been pushed since the last commit.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Values buffered under `tag`, in push order.
    pub fn tag(&self, tag: &str) -> &[TaggedValue] {
        self.tags.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of the tags with buffered values, in first-push order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// Move every buffered value into a new frame, leaving the buffer empty.
    pub fn take_frame(&mut self, timestep: Timestep, origin: Rank) -> CommitFrame {
        let tags = std::mem::take(&mut self.tags);
        self.len = 0;
        CommitFrame::new(timestep, origin, tags)
    }

    fn entry(&mut self, tag: &str) -> &mut Vec<TaggedValue> {
        // Only allocate the key the first time a tag is seen.
        let idx = match self.tags.get_index_of(tag) {
            Some(idx) => idx,
            None => self.tags.insert_full(tag.to_owned(), Vec::new()).0,
        };
        &mut self.tags[idx]
    }

    fn check_tag(&self, tag: &str) -> Result<(), PushError> {
        if tag.is_empty() {
            return Err(PushError::EmptyTag);
        }
        Ok(())
    }

    fn check_point(&self, point: &Point) -> Result<(), PushError> {
        if point.dims() != self.dimensions {
            return Err(PushError::DimensionMismatch {
                expected: self.dimensions,
                got: point.dims(),
            });
        }
        if !point.is_finite() {
            let axis = point
                .coords()
                .iter()
                .position(|c| !c.is_finite())
                .unwrap_or_default();
            return Err(PushError::NonFiniteCoordinate { axis });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tag_created_lazily() {
        let mut buf = PushBuffer::new(2);
        assert!(buf.is_empty());
        buf.push("data", Point::from([0.0, 0.0]), 1.0).unwrap();
        buf.push("temp", Point::from([1.0, 0.0]), 2.0).unwrap();
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.tags().collect::<Vec<_>>(), vec!["data", "temp"]);
        assert_eq!(buf.tag("data").len(), 1);
        assert!(buf.tag("missing").is_empty());
    }

    #[test]
    fn dimension_mismatch_rejected() {
        let mut buf = PushBuffer::new(2);
        let err = buf.push("data", Point::from([0.0, 0.0, 0.0]), 1.0);
        assert_eq!(
            err,
            Err(PushError::DimensionMismatch {
                expected: 2,
                got: 3
            })
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn non_finite_point_rejected() {
        let mut buf = PushBuffer::new(2);
        assert_eq!(
            buf.push("data", Point::from([0.0, f64::NAN]), 1.0),
            Err(PushError::NonFiniteCoordinate { axis: 1 })
        );
        let points = [Point::from([0.0, 0.0]), Point::from([f64::INFINITY, 0.0])];
        assert_eq!(
            buf.push_many("data", &points, &[1.0, 2.0]),
            Err(PushError::NonFiniteCoordinate { axis: 0 })
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn empty_tag_rejected() {
        let mut buf = PushBuffer::new(1);
        assert_eq!(
            buf.push("", Point::from([0.0]), 1.0),
            Err(PushError::EmptyTag)
        );
    }

    #[test]
    fn duplicate_points_retained() {
        let mut buf = PushBuffer::new(1);
        buf.push("data", Point::from([5.0]), 1.0).unwrap();
        buf.push("data", Point::from([5.0]), 2.0).unwrap();
        let values: Vec<f64> = buf.tag("data").iter().map(|tv| tv.value).collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn push_many_is_all_or_nothing() {
        let mut buf = PushBuffer::new(1);
        let points = vec![Point::from([0.0]), Point::from([1.0, 1.0])];
        let err = buf.push_many("data", &points, &[1.0, 2.0]);
        assert_eq!(
            err,
            Err(PushError::DimensionMismatch {
                expected: 1,
                got: 2
            })
        );
        assert!(buf.is_empty());

        let err = buf.push_many("data", &points[..1], &[1.0, 2.0]);
        assert_eq!(
            err,
            Err(PushError::LengthMismatch {
                points: 1,
                values: 2
            })
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn take_frame_drains_buffer() {
        let mut buf = PushBuffer::new(1);
        buf.push_many("data", &[Point::from([0.0]), Point::from([1.0])], &[3.0, 4.0])
            .unwrap();
        let frame = buf.take_frame(Timestep(0), Rank(0));
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.timestep(), Timestep(0));
        assert!(buf.is_empty());
        assert_eq!(buf.tags().count(), 0);

        buf.push("data", Point::from([2.0]), 5.0).unwrap();
        let next = buf.take_frame(Timestep(1), Rank(0));
        assert_eq!(next.len(), 1);
        assert_eq!(frame.len(), 2);
    }
}
