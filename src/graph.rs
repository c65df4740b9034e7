use itertools::Itertools;

use crate::apt::extract::{Extraction, LayoutRecords};
use crate::apt::records::{FrequencyRecord, RunwayEndRecord, TaxiwayVertex};
use crate::error::{Error, Result};
use crate::geo::{self, LatLon, FEET_TO_METER};

/// Parking stands occupy document indices 0-8; taxi nodes start past them.
const INDEX_BASE: u32 = 8;
pub const PARK_COUNT: usize = 9;
pub const PARK_RADIUS_M: f64 = 28.0;

/// Spacing of the generated stand row, fixed at construction time.
#[derive(Debug, Clone, Builder)]
pub struct GenParams {
    /// meters between centers of adjacent parking stands
    #[builder(default = "60.0")]
    pub park_spacing: f64,
    /// meters between the parallel taxiway and the stand centers
    #[builder(default = "50.0")]
    pub park_distance: f64,
}

impl Default for GenParams {
    fn default() -> Self {
        GenParams {
            park_spacing: 60.0,
            park_distance: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldPointType {
    None,
    Normal,
}

impl HoldPointType {
    pub fn as_attr(self) -> &'static str {
        match self {
            HoldPointType::None => "none",
            HoldPointType::Normal => "normal",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GraphNode {
    pub index: u32,
    pub position: LatLon,
    pub on_runway: bool,
    pub hold: HoldPointType,
}

#[derive(Debug, Clone, Copy)]
pub struct ParkingStand {
    pub index: u32,
    pub position: LatLon,
    pub heading_deg: f64,
}

/// One directed taxi edge; every connection is pushed in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxiArc {
    pub begin: u32,
    pub end: u32,
}

#[derive(Debug, Clone)]
pub struct AirportGraph {
    pub icao: String,
    pub frequencies: Vec<FrequencyRecord>,
    pub nodes: Vec<GraphNode>,
    pub stubs: Vec<GraphNode>,
    pub parking: Vec<ParkingStand>,
    pub arcs: Vec<TaxiArc>,
}

impl AirportGraph {
    /// Base nodes followed by the parking stub chain, emission order.
    pub fn taxi_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().chain(&self.stubs)
    }
}

/// One wiring step over the positional base-node list and the stub chain.
/// The templates are literal data, not a derived layout: the positions come
/// from the two fixed airport shapes and do not generalize.
#[derive(Debug, Clone, Copy)]
enum Link {
    Nodes(usize, usize),
    FirstStub(usize),
    StubChain,
    LastStub(usize),
}

const LINKS_810: [Link; 13] = [
    Link::Nodes(0, 1),
    Link::Nodes(1, 2),
    Link::Nodes(0, 11),
    Link::Nodes(11, 10),
    Link::FirstStub(10),
    Link::StubChain,
    Link::LastStub(9),
    Link::Nodes(10, 3),
    Link::Nodes(3, 4),
    Link::Nodes(4, 5),
    Link::Nodes(6, 9),
    Link::Nodes(6, 7),
    Link::Nodes(7, 8),
];

const LINKS_850: [Link; 10] = [
    Link::Nodes(0, 1),
    Link::Nodes(1, 2),
    Link::FirstStub(2),
    Link::StubChain,
    Link::LastStub(3),
    Link::Nodes(3, 4),
    Link::Nodes(4, 5),
    Link::Nodes(6, 5),
    Link::Nodes(3, 7),
    Link::Nodes(7, 8),
];

/// 850 named nodes are pairwise midpoints of fixed vertex positions; the
/// fourth is the midpoint of two intermediate centerpoints.
#[derive(Debug, Clone, Copy)]
enum MidSource {
    Verts(usize, usize),
    Centers,
}

const MIDPOINTS_850: [MidSource; 9] = [
    MidSource::Verts(0, 15),
    MidSource::Verts(16, 17),
    MidSource::Verts(1, 12),
    MidSource::Centers,
    MidSource::Verts(2, 7),
    MidSource::Verts(20, 21),
    MidSource::Verts(3, 4),
    MidSource::Verts(18, 19),
    MidSource::Verts(9, 10),
];

const CENTER_PAIRS_850: [(usize, usize); 2] = [(8, 11), (1, 2)];

const ON_RUNWAY_810: [u32; 3] = [11, 14, 17];
const HOLD_810: [u32; 3] = [10, 13, 16];
const ON_RUNWAY_850: [u32; 3] = [9, 15, 17];
const HOLD_850: [u32; 3] = [10, 14, 16];

pub struct GraphBuilder<'a> {
    params: &'a GenParams,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(params: &'a GenParams) -> Self {
        GraphBuilder { params }
    }

    pub fn build(&self, icao: &str, extraction: Extraction) -> Result<AirportGraph> {
        let Extraction {
            frequencies,
            layout,
        } = extraction;
        let graph = match layout {
            LayoutRecords::Runway(records) => self.build_runway(icao, frequencies, records),
            LayoutRecords::Taxiway {
                vertices,
                heading_deg,
            } => self.build_taxiway(icao, frequencies, vertices, heading_deg),
        }?;
        let degenerate = graph.taxi_nodes().any(|n| !n.position.is_finite())
            || graph.parking.iter().any(|p| !p.position.is_finite());
        if degenerate {
            return Err(Error::DegenerateGeometry {
                icao: icao.to_owned(),
            });
        }
        Ok(graph)
    }

    /// 810: each centerline segment contributes a far end, its midpoint and
    /// a near end; the long parallel-taxiway segment also anchors the stand
    /// row.
    fn build_runway(
        &self,
        icao: &str,
        frequencies: Vec<FrequencyRecord>,
        records: Vec<RunwayEndRecord>,
    ) -> Result<AirportGraph> {
        if records.len() < 4 {
            return Err(Error::IncompleteLayout {
                icao: icao.to_owned(),
            });
        }
        let mut nodes = Vec::new();
        let mut stubs = Vec::new();
        let mut parking = Vec::new();
        let mut index = INDEX_BASE;
        for rec in &records {
            let heading = rec.heading_deg;
            let heading_back = geo::back_bearing(heading);
            let half_len = rec.length_ft * FEET_TO_METER / 2.0;
            let fwd = rec.midpoint.project(heading, half_len);
            let back = rec.midpoint.project(heading_back, half_len);
            // forward latitude pairs with the back-projected longitude; the
            // projection's longitude sign runs opposite the bearing, so the
            // mix lands both ends where they belong
            index += 1;
            nodes.push(flagged(index, LatLon::new(fwd.lat(), back.lon()), &ON_RUNWAY_810, &HOLD_810));
            index += 1;
            nodes.push(flagged(index, rec.midpoint, &ON_RUNWAY_810, &HOLD_810));
            index += 1;
            nodes.push(flagged(index, LatLon::new(back.lat(), fwd.lon()), &ON_RUNWAY_810, &HOLD_810));

            if half_len > 300.0 {
                self.place_stand_row(rec.midpoint, heading, &mut index, &mut parking, &mut stubs);
            }
        }
        if stubs.is_empty() {
            return Err(Error::IncompleteLayout {
                icao: icao.to_owned(),
            });
        }
        let arcs = wire(&LINKS_810, &nodes, &stubs, &parking);
        Ok(AirportGraph {
            icao: icao.to_owned(),
            frequencies,
            nodes,
            stubs,
            parking,
            arcs,
        })
    }

    /// 850: nine named nodes from the midpoint table, stand row anchored at
    /// the third one using the extracted taxiway heading.
    fn build_taxiway(
        &self,
        icao: &str,
        frequencies: Vec<FrequencyRecord>,
        vertices: Vec<TaxiwayVertex>,
        heading_deg: f64,
    ) -> Result<AirportGraph> {
        if vertices.len() < 22 {
            return Err(Error::IncompleteLayout {
                icao: icao.to_owned(),
            });
        }
        let v = |i: usize| vertices[i].position;
        let center1 = geo::midpoint(v(CENTER_PAIRS_850[0].0), v(CENTER_PAIRS_850[0].1));
        let center2 = geo::midpoint(v(CENTER_PAIRS_850[1].0), v(CENTER_PAIRS_850[1].1));
        let mut nodes = Vec::with_capacity(MIDPOINTS_850.len());
        let mut index = INDEX_BASE;
        for source in &MIDPOINTS_850 {
            let position = match *source {
                MidSource::Verts(a, b) => geo::midpoint(v(a), v(b)),
                MidSource::Centers => geo::midpoint(center1, center2),
            };
            index += 1;
            nodes.push(flagged(index, position, &ON_RUNWAY_850, &HOLD_850));
        }
        let anchor = nodes[2].position;
        let mut stubs = Vec::new();
        let mut parking = Vec::new();
        self.place_stand_row(anchor, heading_deg, &mut index, &mut parking, &mut stubs);
        let arcs = wire(&LINKS_850, &nodes, &stubs, &parking);
        Ok(AirportGraph {
            icao: icao.to_owned(),
            frequencies,
            nodes,
            stubs,
            parking,
            arcs,
        })
    }

    /// Walks the stand anchors out along the taxiway and offsets each stand
    /// perpendicular to it; every stand gets one plain stub node on the
    /// taxiway itself.
    fn place_stand_row(
        &self,
        anchor: LatLon,
        heading: f64,
        index: &mut u32,
        parking: &mut Vec<ParkingStand>,
        stubs: &mut Vec<GraphNode>,
    ) {
        let heading_back = geo::back_bearing(heading);
        let side = geo::wrap_bearing(heading + 90.0);
        let side_back = geo::back_bearing(side);
        for i in 1..=PARK_COUNT {
            let along = self.params.park_spacing * i as f64;
            let fwd = anchor.project(heading, along);
            let back = anchor.project(heading_back, along);
            let stub_pos = LatLon::new(fwd.lat(), back.lon());
            let out = stub_pos.project(side, self.params.park_distance);
            let inward = stub_pos.project(side_back, self.params.park_distance);
            parking.push(ParkingStand {
                index: (i - 1) as u32,
                position: LatLon::new(out.lat(), inward.lon()),
                heading_deg: side_back,
            });
            *index += 1;
            stubs.push(GraphNode {
                index: *index,
                position: stub_pos,
                on_runway: false,
                hold: HoldPointType::None,
            });
        }
    }
}

fn flagged(index: u32, position: LatLon, on_runway: &[u32], hold: &[u32]) -> GraphNode {
    GraphNode {
        index,
        position,
        on_runway: on_runway.contains(&index),
        hold: if hold.contains(&index) {
            HoldPointType::Normal
        } else {
            HoldPointType::None
        },
    }
}

fn wire(
    links: &[Link],
    nodes: &[GraphNode],
    stubs: &[GraphNode],
    parking: &[ParkingStand],
) -> Vec<TaxiArc> {
    let mut arcs = Vec::new();
    for (stand, stub) in parking.iter().zip(stubs) {
        link(&mut arcs, stand.index, stub.index);
    }
    for step in links {
        match *step {
            Link::Nodes(a, b) => link(&mut arcs, nodes[a].index, nodes[b].index),
            Link::FirstStub(a) => link(&mut arcs, nodes[a].index, stubs[0].index),
            Link::StubChain => {
                for (s, t) in stubs.iter().tuple_windows() {
                    link(&mut arcs, s.index, t.index);
                }
            }
            Link::LastStub(a) => link(&mut arcs, nodes[a].index, stubs[stubs.len() - 1].index),
        }
    }
    arcs
}

fn link(arcs: &mut Vec<TaxiArc>, a: u32, b: u32) {
    arcs.push(TaxiArc { begin: a, end: b });
    arcs.push(TaxiArc { begin: b, end: a });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apt::records::VertexKind;

    fn runway_record(lat: f64, lon: f64, heading: f64, length_ft: f64) -> RunwayEndRecord {
        RunwayEndRecord {
            midpoint: LatLon::new(lat, lon),
            heading_deg: heading,
            length_ft,
            width_ft: 40.0,
        }
    }

    fn extraction_810() -> Extraction {
        Extraction {
            frequencies: vec![],
            layout: LayoutRecords::Runway(vec![
                runway_record(45.01, 13.01, 90.0, 1000.0),
                runway_record(45.0, 13.0, 90.0, 1000.0),
                runway_record(44.99, 12.99, 90.0, 1000.0),
                runway_record(45.0, 13.0, 90.0, 10000.0),
            ]),
        }
    }

    fn grid_vertices() -> Vec<TaxiwayVertex> {
        (0..22)
            .map(|i| TaxiwayVertex {
                position: LatLon::new(47.0 + i as f64 * 0.001, 11.0 + i as f64 * 0.002),
                kind: VertexKind::Plain,
            })
            .collect()
    }

    fn expand(pairs: &[(u32, u32)]) -> Vec<TaxiArc> {
        let mut arcs = Vec::new();
        for &(a, b) in pairs {
            arcs.push(TaxiArc { begin: a, end: b });
            arcs.push(TaxiArc { begin: b, end: a });
        }
        arcs
    }

    #[test]
    fn golden_810_topology() {
        let params = GenParams::default();
        let graph = GraphBuilder::new(&params)
            .build("LDRI", extraction_810())
            .unwrap();

        assert_eq!(graph.nodes.len(), 12);
        assert_eq!(graph.stubs.len(), 9);
        assert_eq!(graph.parking.len(), 9);
        let node_indices: Vec<u32> = graph.nodes.iter().map(|n| n.index).collect();
        assert_eq!(node_indices, (9..=20).collect::<Vec<u32>>());
        let stub_indices: Vec<u32> = graph.stubs.iter().map(|n| n.index).collect();
        assert_eq!(stub_indices, (21..=29).collect::<Vec<u32>>());

        let expected = expand(&[
            // stand to stub
            (0, 21),
            (1, 22),
            (2, 23),
            (3, 24),
            (4, 25),
            (5, 26),
            (6, 27),
            (7, 28),
            (8, 29),
            // runway and crossing taxiways
            (9, 10),
            (10, 11),
            (9, 20),
            (20, 19),
            (19, 21),
            // stub chain
            (21, 22),
            (22, 23),
            (23, 24),
            (24, 25),
            (25, 26),
            (26, 27),
            (27, 28),
            (28, 29),
            (18, 29),
            (19, 12),
            (12, 13),
            (13, 14),
            (15, 18),
            (15, 16),
            (16, 17),
        ]);
        assert_eq!(graph.arcs, expected);
    }

    #[test]
    fn arcs_come_in_swapped_pairs() {
        let params = GenParams::default();
        let graph = GraphBuilder::new(&params)
            .build("LDRI", extraction_810())
            .unwrap();
        assert_eq!(graph.arcs.len() % 2, 0);
        for pair in graph.arcs.chunks(2) {
            assert_eq!(pair[0].begin, pair[1].end);
            assert_eq!(pair[0].end, pair[1].begin);
        }
        // every endpoint is a known node, stub or stand index
        let known: std::collections::HashSet<u32> = graph
            .taxi_nodes()
            .map(|n| n.index)
            .chain(graph.parking.iter().map(|p| p.index))
            .collect();
        for arc in &graph.arcs {
            assert!(known.contains(&arc.begin));
            assert!(known.contains(&arc.end));
        }
    }

    #[test]
    fn runway_flags_sit_on_fixed_indices() {
        let params = GenParams::default();
        let graph = GraphBuilder::new(&params)
            .build("LDRI", extraction_810())
            .unwrap();
        for node in graph.taxi_nodes() {
            assert_eq!(node.on_runway, ON_RUNWAY_810.contains(&node.index));
            let hold = node.hold == HoldPointType::Normal;
            assert_eq!(hold, HOLD_810.contains(&node.index));
        }
    }

    #[test]
    fn stand_row_spacing_follows_params() {
        let params = GenParams::default();
        let graph = GraphBuilder::new(&params)
            .build("LDRI", extraction_810())
            .unwrap();
        // eastward taxiway: stubs march east of the anchor at ~60 m per step
        let anchor_lon = 13.0f64;
        let step = graph.stubs[0].position.lon() - anchor_lon;
        assert!(step > 0.0);
        for (i, stub) in graph.stubs.iter().enumerate() {
            let expected = step * (i + 1) as f64;
            assert!((stub.position.lon() - anchor_lon - expected).abs() < 1e-6);
            assert!((stub.position.lat() - 45.0).abs() < 1e-4);
        }
    }

    #[test]
    fn too_few_segments_is_incomplete() {
        let params = GenParams::default();
        let ex = Extraction {
            frequencies: vec![],
            layout: LayoutRecords::Runway(vec![runway_record(45.0, 13.0, 90.0, 10000.0)]),
        };
        match GraphBuilder::new(&params).build("LDRI", ex) {
            Err(Error::IncompleteLayout { .. }) => (),
            other => panic!("expected IncompleteLayout, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn all_short_segments_leave_no_stand_row() {
        let params = GenParams::default();
        let ex = Extraction {
            frequencies: vec![],
            layout: LayoutRecords::Runway(vec![
                runway_record(45.01, 13.01, 90.0, 1000.0),
                runway_record(45.0, 13.0, 90.0, 1000.0),
                runway_record(44.99, 12.99, 90.0, 1000.0),
                runway_record(45.0, 13.0, 90.0, 1500.0),
            ]),
        };
        assert!(GraphBuilder::new(&params).build("LDRI", ex).is_err());
    }

    #[test]
    fn nan_coordinates_are_degenerate() {
        let params = GenParams::default();
        let ex = Extraction {
            frequencies: vec![],
            layout: LayoutRecords::Runway(vec![
                runway_record(f64::NAN, 13.01, 90.0, 1000.0),
                runway_record(45.0, 13.0, 90.0, 1000.0),
                runway_record(44.99, 12.99, 90.0, 1000.0),
                runway_record(45.0, 13.0, 90.0, 10000.0),
            ]),
        };
        match GraphBuilder::new(&params).build("LDRI", ex) {
            Err(Error::DegenerateGeometry { .. }) => (),
            other => panic!("expected DegenerateGeometry, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn golden_850_topology() {
        let params = GenParams::default();
        let ex = Extraction {
            frequencies: vec![],
            layout: LayoutRecords::Taxiway {
                vertices: grid_vertices(),
                heading_deg: 40.0,
            },
        };
        let graph = GraphBuilder::new(&params).build("LOWI", ex).unwrap();

        assert_eq!(graph.nodes.len(), 9);
        let node_indices: Vec<u32> = graph.nodes.iter().map(|n| n.index).collect();
        assert_eq!(node_indices, (9..=17).collect::<Vec<u32>>());
        let stub_indices: Vec<u32> = graph.stubs.iter().map(|n| n.index).collect();
        assert_eq!(stub_indices, (18..=26).collect::<Vec<u32>>());

        // node "9" is the midpoint of vertices 0 and 15
        let expected_first = geo::midpoint(
            grid_vertices()[0].position,
            grid_vertices()[15].position,
        );
        assert_eq!(graph.nodes[0].position, expected_first);

        for node in graph.taxi_nodes() {
            assert_eq!(node.on_runway, ON_RUNWAY_850.contains(&node.index));
            let hold = node.hold == HoldPointType::Normal;
            assert_eq!(hold, HOLD_850.contains(&node.index));
        }

        let expected = expand(&[
            (0, 18),
            (1, 19),
            (2, 20),
            (3, 21),
            (4, 22),
            (5, 23),
            (6, 24),
            (7, 25),
            (8, 26),
            (9, 10),
            (10, 11),
            (11, 18),
            (18, 19),
            (19, 20),
            (20, 21),
            (21, 22),
            (22, 23),
            (23, 24),
            (24, 25),
            (25, 26),
            (12, 26),
            (12, 13),
            (13, 14),
            (15, 14),
            (12, 16),
            (16, 17),
        ]);
        assert_eq!(graph.arcs, expected);
    }

    #[test]
    fn missing_vertices_are_incomplete() {
        let params = GenParams::default();
        let mut vertices = grid_vertices();
        vertices.truncate(21);
        let ex = Extraction {
            frequencies: vec![],
            layout: LayoutRecords::Taxiway {
                vertices,
                heading_deg: 40.0,
            },
        };
        match GraphBuilder::new(&params).build("LOWI", ex) {
            Err(Error::IncompleteLayout { .. }) => (),
            other => panic!("expected IncompleteLayout, got {:?}", other.map(|_| ())),
        }
    }
}
