/// Checks that `$obj` survives arkworks serialization, compressed and uncompressed, and serde serialization to
/// JSON and MessagePack. Needs `CanonicalSerialize` and `CanonicalDeserialize` in scope of the caller.
#[macro_export]
macro_rules! test_serialization {
    ($obj_type:ty, $obj: expr) => {
        let mut compressed = vec![];
        CanonicalSerialize::serialize_compressed(&$obj, &mut compressed).unwrap();
        assert_eq!(compressed.len(), $obj.compressed_size());
        let deserz: $obj_type =
            CanonicalDeserialize::deserialize_compressed(&compressed[..]).unwrap();
        assert_eq!(deserz, $obj);
        let deserz: $obj_type =
            CanonicalDeserialize::deserialize_compressed_unchecked(&compressed[..]).unwrap();
        assert_eq!(deserz, $obj);

        let mut uncompressed = vec![];
        $obj.serialize_uncompressed(&mut uncompressed).unwrap();
        assert!(uncompressed.len() >= compressed.len());
        let deserz: $obj_type =
            CanonicalDeserialize::deserialize_uncompressed(&uncompressed[..]).unwrap();
        assert_eq!(deserz, $obj);

        let json = serde_json::to_string(&$obj).unwrap();
        assert_eq!(serde_json::from_str::<$obj_type>(&json).unwrap(), $obj);

        let msgpack = rmp_serde::to_vec_named(&$obj).unwrap();
        assert_eq!(rmp_serde::from_slice::<$obj_type>(&msgpack).unwrap(), $obj);
    };
}
