//! Decoding tests that exercise the full raw-frame -> typed-command path the
//! way inbound Z/IP packet bodies reach it.

use zip_cc::prelude::*;
use zip_core::hex_bytes;
use zip_core::parse::Parsable;
use zip_core::prelude::*;
use zip_core::serialize::Serializable;

fn decode(body: bytes::Bytes) -> CcOrRaw {
    let mut input = body;
    let raw = CCRaw::parse(&mut input).expect("raw frame must parse");
    CcOrRaw::from_raw(raw, &CCParsingContext::default()).expect("decode must be total")
}

#[test]
fn node_list_report_expands_bitmask() {
    let mut body = bytes::BytesMut::new();
    zip_core::serialize::bytes::slice(&[0x52u8, 0x02, 0x01, 0x00, 0x00, 0x05])
        .serialize(&mut body);
    zip_core::serialize::bytes::slice(&[0u8; 26]).serialize(&mut body);

    match decode(body.freeze()) {
        CcOrRaw::CC(CC::NetworkManagementProxyCCNodeListReport(report)) => {
            assert_eq!(report.seq_no, 1);
            assert_eq!(report.status, 0);
            assert_eq!(
                report.node_list,
                vec![NodeId::new(1).unwrap(), NodeId::new(3).unwrap()]
            );
        }
        other => panic!("expected a node list report, got {:?}", other),
    }
}

#[test]
fn dsk_string_encodes_to_bytes() {
    let dsk: Dsk = "50285-18819-09924-30691-15973-33711-04005-03623"
        .parse()
        .unwrap();
    assert_eq!(
        dsk.as_slice(),
        &[
            0xc4, 0x6d, 0x49, 0x83, 0x26, 0xc4, 0x77, 0xe3, 0x3e, 0x65, 0x83, 0xaf, 0x0f, 0xa5,
            0x0e, 0x27,
        ]
    );
}

#[test]
fn multilevel_sensor_report_scales_by_precision() {
    // type = air temperature, precision 1, size 2, value 200
    match decode(hex_bytes!("3105012200c8")) {
        CcOrRaw::CC(CC::MultilevelSensorCCReport(report)) => {
            assert_eq!(
                report.sensor_type,
                MaybeKnown::Known(MultilevelSensorType::AirTemperature)
            );
            assert_eq!(report.level(), 20);
        }
        other => panic!("expected a sensor report, got {:?}", other),
    }
}

#[test]
fn unknown_command_pair_is_carried_verbatim() {
    match decode(hex_bytes!("fefe010203")) {
        CcOrRaw::Raw(raw) => {
            assert_eq!(raw.cc_id, CommandClassId::Unknown(0xfe));
            assert_eq!(raw.cc_command, Some(0xfe));
            assert_eq!(raw.payload, hex_bytes!("010203"));
        }
        other => panic!("expected a raw command, got {:?}", other),
    }
}

#[test]
fn arbitrary_bodies_never_panic() {
    // A decode attempt over every 2-byte prefix with a short tail must always
    // return, either as a typed command, a raw one, or a parse error
    for cc in 0u8..=255 {
        for cmd in [0x00u8, 0x01, 0x05, 0x13, 0xff] {
            let body = bytes::Bytes::from(vec![cc, cmd, 0x01, 0x02]);
            let mut input = body;
            if let Ok(raw) = CCRaw::parse(&mut input) {
                let _ = CcOrRaw::from_raw(raw, &CCParsingContext::default());
            }
        }
    }
}

#[test]
fn encode_decode_roundtrip_for_sendable_commands() {
    let ctx = CCParsingContext::default();
    let commands: Vec<CC> = vec![
        BasicCCSet::builder().target_value(BinarySet::Off).build().into(),
        BinarySwitchCCGet::default().into(),
        MultilevelSwitchCCSet::builder()
            .target_value(LevelSet::Level(42))
            .build()
            .into(),
        ConfigurationCCSet::builder()
            .parameter(7)
            .size(2)
            .value(-300)
            .build()
            .into(),
        NetworkManagementProxyCCNodeListGet::builder()
            .seq_no(9)
            .build()
            .into(),
        NetworkManagementInclusionCCNodeAdd::builder()
            .seq_no(3)
            .build()
            .into(),
        WakeUpCCIntervalSet::builder()
            .interval_seconds(86400)
            .node_id(NodeId::new(1).unwrap())
            .build()
            .into(),
    ];

    for cc in commands {
        let bytes = cc.as_raw().as_bytes();
        let mut input = bytes;
        let raw = CCRaw::parse(&mut input).unwrap();
        let parsed = CC::try_from_raw(raw, &ctx).unwrap();
        assert_eq!(parsed, cc);
    }
}
