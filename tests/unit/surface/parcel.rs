use super::*;

fn cap(v: u64) -> Option<CapabilityId> {
    NonZeroU64::new(v).map(CapabilityId)
}

#[test]
fn field_order_is_fixed() {
    let rec = HandleRecord {
        client: cap(0x11),
        surface: cap(0x22),
        token: SurfaceToken(3),
        identity: 4,
        width: 5,
        height: 6,
        format: PixelFormat(7),
        flags: SurfaceFlags::from_bits_retain(8),
    };
    let mut p = Parcel::new();
    rec.write_to(&mut p);

    let mut expect = Vec::new();
    expect.extend_from_slice(&0x11u64.to_le_bytes());
    expect.extend_from_slice(&0x22u64.to_le_bytes());
    for v in 3i32..=8 {
        expect.extend_from_slice(&v.to_le_bytes());
    }
    assert_eq!(p.as_bytes(), expect.as_slice());

    let mut back = Parcel::from_bytes(p.as_bytes().to_vec());
    assert_eq!(HandleRecord::read_from(&mut back).unwrap(), rec);
}

#[test]
fn invalid_record_is_null_and_negative_token() {
    let mut p = Parcel::new();
    HandleRecord::INVALID.write_to(&mut p);
    let bytes = p.as_bytes();
    assert_eq!(bytes.len(), 8 + 8 + 6 * 4);
    assert!(bytes[..16].iter().all(|&b| b == 0));
    assert_eq!(&bytes[16..20], &(-1i32).to_le_bytes());
    assert!(bytes[20..].iter().all(|&b| b == 0));
}

#[test]
fn truncated_parcel_fails() {
    let mut p = Parcel::from_bytes(vec![0; 10]);
    assert!(p.read_capability().is_ok());
    assert!(matches!(p.read_i32(), Err(SurfaceError::InvalidArgument(_))));
}
