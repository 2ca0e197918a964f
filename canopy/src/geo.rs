use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// WGS-84 latitude/longitude pair as displayed on the map.
#[derive(Clone, Copy, Default, PartialEq, Debug, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Sides of an axis-aligned region, indexed 0..3.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Top, Side::Right, Side::Bottom];

    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Top => 1,
            Side::Right => 2,
            Side::Bottom => 3,
        }
    }
}

/// Axis-aligned rectangle on the map, stored as normalized south-west and
/// north-east corners.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct BoundingRegion {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl BoundingRegion {
    /// Builds a region from two opposite corners, normalizing coordinate
    /// order so that `south_west` is always the minimum corner.
    pub fn new(a: Coordinate, b: Coordinate) -> Self {
        Self {
            south_west: Coordinate::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: Coordinate::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    /// Region of fixed half-extent around a click point. Degree-based, so not
    /// geodesically uniform at all latitudes; acceptable at city-scale zoom.
    pub fn around(center: Coordinate, half_extent_deg: f64) -> Self {
        Self::new(
            Coordinate::new(center.lat - half_extent_deg, center.lng - half_extent_deg),
            Coordinate::new(center.lat + half_extent_deg, center.lng + half_extent_deg),
        )
    }

    /// Normalized bounds of an arbitrary corner set, `None` when empty.
    pub fn from_corners<It>(corners: It) -> Option<Self>
    where
        It: IntoIterator<Item = Coordinate>,
    {
        let mut corners = corners.into_iter();
        let first = corners.next()?;
        let mut region = Self::new(first, first);
        for corner in corners {
            region = Self::new(
                Coordinate::new(
                    region.south_west.lat.min(corner.lat),
                    region.south_west.lng.min(corner.lng),
                ),
                Coordinate::new(
                    region.north_east.lat.max(corner.lat),
                    region.north_east.lng.max(corner.lng),
                ),
            );
        }
        Some(region)
    }

    pub fn south_east(&self) -> Coordinate {
        Coordinate::new(self.south_west.lat, self.north_east.lng)
    }

    pub fn north_west(&self) -> Coordinate {
        Coordinate::new(self.north_east.lat, self.south_west.lng)
    }

    /// Endpoints of one side of the rectangle.
    pub fn side_endpoints(&self, side: Side) -> (Coordinate, Coordinate) {
        match side {
            Side::Left => (self.south_west, self.north_west()),
            Side::Top => (self.north_west(), self.north_east),
            Side::Right => (self.north_east, self.south_east()),
            Side::Bottom => (self.south_east(), self.south_west),
        }
    }

    pub fn side_midpoint(&self, side: Side) -> Coordinate {
        let (a, b) = self.side_endpoints(side);
        Coordinate::new((a.lat + b.lat) / 2.0, (a.lng + b.lng) / 2.0)
    }

    pub fn side_length_m(&self, side: Side) -> f64 {
        let (a, b) = self.side_endpoints(side);
        distance_m(a, b)
    }

    /// Closed 5-point polygon ring (first point repeated last), the shape the
    /// download service expects for its area of interest.
    pub fn closed_ring(&self) -> [Coordinate; 5] {
        [
            self.south_west,
            self.south_east(),
            self.north_east,
            self.north_west(),
            self.south_west,
        ]
    }
}

/// Haversine great-circle distance between two coordinates, in meters.
pub fn distance_m(a: Coordinate, b: Coordinate) -> f64 {
    let phi_a = a.lat.to_radians();
    let phi_b = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (d_lambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Below 1 km distances render as integer meters, at or above as kilometers
/// with two decimals. Fixed display contract.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} m", meters.round() as i64)
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

// Per-side (lat, lng) label offsets in degrees, tuned by eye against the
// default city-scale zoom of the map shell. Intentionally not derived from
// the region's size; labels drift at very different zoom levels.
const LABEL_OFFSETS_DEG: [(f64, f64); 4] = [
    (0.0, -0.0032),
    (0.0012, 0.0),
    (0.0, 0.0032),
    (-0.0012, 0.0),
];

/// Anchor point for a side's distance label, pushed away from the edge so the
/// label does not overlap it.
pub fn label_anchor(side: Side, midpoint: Coordinate) -> Coordinate {
    let (d_lat, d_lng) = LABEL_OFFSETS_DEG[side.index()];
    Coordinate::new(midpoint.lat + d_lat, midpoint.lng + d_lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_zero_for_same_point() {
        let p = Coordinate::new(48.2082, 16.3738);
        assert_eq!(distance_m(p, p), 0.0);
    }

    #[test]
    fn distance_one_degree_latitude() {
        // One degree of latitude is roughly 111.2 km on a 6371 km sphere.
        let a = Coordinate::new(47.0, 15.0);
        let b = Coordinate::new(48.0, 15.0);
        let d = distance_m(a, b);
        assert!((d - 111_195.0).abs() < 100.0, "got {}", d);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(48.2082, 16.3738);
        let b = Coordinate::new(48.2100, 16.3800);
        assert_eq!(distance_m(a, b), distance_m(b, a));
    }

    #[test]
    fn format_distance_below_threshold_is_integer_meters() {
        assert_eq!(format_distance(950.4), "950 m");
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(999.4), "999 m");
    }

    #[test]
    fn format_distance_at_threshold_is_kilometers() {
        assert_eq!(format_distance(1000.0), "1.00 km");
        assert_eq!(format_distance(1500.0), "1.50 km");
        assert_eq!(format_distance(12_340.0), "12.34 km");
    }

    #[test]
    fn new_normalizes_corner_order() {
        let region = BoundingRegion::new(
            Coordinate::new(48.3, 16.5),
            Coordinate::new(48.1, 16.2),
        );
        assert_eq!(region.south_west, Coordinate::new(48.1, 16.2));
        assert_eq!(region.north_east, Coordinate::new(48.3, 16.5));
    }

    #[test]
    fn from_corners_takes_extremes() {
        let region = BoundingRegion::from_corners([
            Coordinate::new(48.2, 16.4),
            Coordinate::new(48.1, 16.5),
            Coordinate::new(48.3, 16.2),
            Coordinate::new(48.25, 16.3),
        ])
        .unwrap();
        assert_eq!(region.south_west, Coordinate::new(48.1, 16.2));
        assert_eq!(region.north_east, Coordinate::new(48.3, 16.5));
    }

    #[test]
    fn from_corners_empty_is_none() {
        assert_eq!(BoundingRegion::from_corners(std::iter::empty()), None);
    }

    #[test]
    fn closed_ring_starts_and_ends_at_south_west() {
        let region = BoundingRegion::around(Coordinate::new(48.2, 16.37), 0.01);
        let ring = region.closed_ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);
        assert_eq!(ring[0], region.south_west);
    }

    #[test]
    fn side_midpoints_lie_on_bounds() {
        let region = BoundingRegion::around(Coordinate::new(48.2, 16.37), 0.01);
        let left = region.side_midpoint(Side::Left);
        assert_eq!(left.lng, region.south_west.lng);
        assert_eq!(left.lat, 48.2);
        let top = region.side_midpoint(Side::Top);
        assert_eq!(top.lat, region.north_east.lat);
        assert_eq!(top.lng, 16.37);
    }

    #[test]
    fn label_anchor_offsets_differ_per_side() {
        let mid = Coordinate::new(48.2, 16.37);
        let anchors: Vec<Coordinate> = Side::ALL
            .iter()
            .map(|&side| label_anchor(side, mid))
            .collect();
        for i in 0..anchors.len() {
            for j in (i + 1)..anchors.len() {
                assert_ne!(anchors[i], anchors[j]);
            }
        }
        assert!(anchors[Side::Left.index()].lng < mid.lng);
        assert!(anchors[Side::Right.index()].lng > mid.lng);
        assert!(anchors[Side::Top.index()].lat > mid.lat);
        assert!(anchors[Side::Bottom.index()].lat < mid.lat);
    }
}
