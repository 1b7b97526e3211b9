use crate::make_fixed_key;
use crate::Base;
use crate::DBColumnFamily;
use crate::WriteEntry;

use pretty_assertions::assert_eq;

pub fn test_base_trait(eng: &dyn Base) {
    let none = eng.get(DBColumnFamily::Record, b"init").unwrap();
    assert_eq!(none, None);
    let none = eng.get(DBColumnFamily::Status, b"init").unwrap();
    assert_eq!(none, None);

    let r = eng.delete(DBColumnFamily::Record, b"init");
    assert!(r.is_ok());

    let kvs = vec![
        (b"k0".to_vec(), b"v0".to_vec()),
        (b"k1".to_vec(), b"v1".to_vec()),
        (b"k2".to_vec(), b"v2".to_vec()),
    ];

    for (k, v) in kvs.iter() {
        eng.set(DBColumnFamily::Status, k, v).unwrap();
    }

    // column families do not share keys
    let r = eng.get(DBColumnFamily::Record, &kvs[0].0).unwrap();
    assert_eq!(None, r);
    let r = eng.get(DBColumnFamily::Status, &kvs[0].0).unwrap();
    assert_eq!(r, Some(kvs[0].1.clone()));

    // overwrite
    eng.set(DBColumnFamily::Status, &kvs[0].0, b"v00").unwrap();
    let r = eng.get(DBColumnFamily::Status, &kvs[0].0).unwrap();
    assert_eq!(r, Some(b"v00".to_vec()));

    eng.delete(DBColumnFamily::Status, &kvs[0].0).unwrap();
    let r = eng.get(DBColumnFamily::Status, &kvs[0].0).unwrap();
    assert!(r.is_none());

    let r = eng.get(DBColumnFamily::Status, &kvs[1].0).unwrap();
    assert_eq!(r, Some(kvs[1].1.clone()));
}

pub fn test_write_batch(eng: &dyn Base) {
    eng.set(DBColumnFamily::Record, b"gone", b"x").unwrap();

    let batch = vec![
        WriteEntry::Set(DBColumnFamily::Record, b"a".to_vec(), b"1".to_vec()),
        WriteEntry::Nil,
        WriteEntry::Set(DBColumnFamily::Status, b"b".to_vec(), b"2".to_vec()),
        WriteEntry::Delete(DBColumnFamily::Record, b"gone".to_vec()),
        // a later entry on the same key wins
        WriteEntry::Set(DBColumnFamily::Record, b"a".to_vec(), b"3".to_vec()),
    ];

    eng.write_batch(&batch).unwrap();

    assert_eq!(
        Some(b"3".to_vec()),
        eng.get(DBColumnFamily::Record, b"a").unwrap()
    );
    assert_eq!(
        Some(b"2".to_vec()),
        eng.get(DBColumnFamily::Status, b"b").unwrap()
    );
    assert_eq!(None, eng.get(DBColumnFamily::Record, b"gone").unwrap());

    eng.write_batch(&[]).unwrap();
}

pub fn test_prev(eng: &dyn Base) {
    let pref = "/t";
    let k = |i: u64| make_fixed_key(pref, i);

    assert_eq!(None, eng.prev(DBColumnFamily::Record, &k(100), true));

    for i in &[1u64, 5, 0x10] {
        eng.set(DBColumnFamily::Record, &k(*i), format!("{}", i).as_bytes())
            .unwrap();
    }

    let cases = vec![
        (0u64, true, None),
        (1, true, Some(1u64)),
        (1, false, None),
        (4, true, Some(1)),
        (5, true, Some(5)),
        (5, false, Some(1)),
        (0x10, false, Some(5)),
        (0x11, false, Some(0x10)),
        (u64::MAX, true, Some(0x10)),
    ];

    for (key, include, want) in cases {
        let got = eng.prev(DBColumnFamily::Record, &k(key), include);
        let want = want.map(|i| (k(i), format!("{}", i).into_bytes()));
        assert_eq!(want, got, "prev of {} include:{}", key, include);
    }

    // other column families are not visible
    assert_eq!(None, eng.prev(DBColumnFamily::Status, &k(u64::MAX), true));
}

#[test]
fn test_fixed_key() {
    use crate::parse_fixed_key;

    assert_eq!(b"/r/000000000000000a".to_vec(), make_fixed_key("/r", 10u64));
    assert_eq!(Some(10), parse_fixed_key("/r", &make_fixed_key("/r", 10u64)));
    assert_eq!(
        Some(u64::MAX),
        parse_fixed_key("/r", &make_fixed_key("/r", u64::MAX))
    );

    assert_eq!(None, parse_fixed_key("/x", &make_fixed_key("/r", 10u64)));
    assert_eq!(None, parse_fixed_key("/r", b"/r/10"));
    assert_eq!(None, parse_fixed_key("/r", b"/r/zzzzzzzzzzzzzzzz"));

    // the byte order follows the numeric order
    assert!(make_fixed_key("/r", 9u64) < make_fixed_key("/r", 10u64));
    assert!(make_fixed_key("/r", 0xffu64) < make_fixed_key("/r", 0x100u64));
}
