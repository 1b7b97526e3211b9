use std::fs;
use std::path::Path;

use crate::DBColumnFamily;
use rocksdb::{ColumnFamilyOptions, DBOptions, DB};

/// rocksdb always has this column family. It must be opened but it is never written to.
const DEFAULT_CF: &str = "default";

struct CFOptions {
    cf: DBColumnFamily,
    options: ColumnFamilyOptions,
}

impl CFOptions {
    fn new(cf: DBColumnFamily, options: ColumnFamilyOptions) -> CFOptions {
        CFOptions { cf, options }
    }
}

fn get_all_cfs_opts() -> Vec<CFOptions> {
    let mut cfs_opts = Vec::with_capacity(DBColumnFamily::all().len());

    for cf in DBColumnFamily::all() {
        cfs_opts.push(CFOptions::new(cf, ColumnFamilyOptions::new()));
    }

    return cfs_opts;
}

/// db_exists returns true if `path` is a non-empty directory.
pub fn db_exists(path: &str) -> Result<bool, String> {
    let db_path = Path::new(path);
    if !db_path.exists() || !db_path.is_dir() {
        return Ok(false);
    }

    match fs::read_dir(path) {
        Ok(mut dir) => {
            return Ok(dir.next().is_some());
        }
        Err(err) => return Err(format!("read path {} failed, got error: {}", path, err)),
    }
}

/// open opens the rocksdb at `path` with all column families in `DBColumnFamily`.
/// If there is no db at `path` it creates one when `create` is true and fails otherwise.
pub fn open(path: &str, create: bool) -> Result<DB, String> {
    let mut db_opt = DBOptions::new();

    let cfs_opts = get_all_cfs_opts();

    if !db_exists(path)? {
        if !create {
            return Err(format!("no db found at {}", path));
        }

        db_opt.create_if_missing(true);
        return open_db_cfs(path, db_opt, cfs_opts, vec![DEFAULT_CF.to_string()]);
    }

    db_opt.create_if_missing(false);

    let existed = DB::list_column_families(&db_opt, path)?;

    let mut new_cfs_opts = vec![];
    for x in cfs_opts {
        let name: &str = x.cf.into();
        if !existed.iter().any(|e| e == name) {
            new_cfs_opts.push(x);
        }
    }

    return open_db_cfs(path, db_opt, new_cfs_opts, existed);
}

fn open_db_cfs(
    path: &str,
    db_opt: DBOptions,
    new_cfs_opts: Vec<CFOptions>,
    exist_cfs: Vec<String>,
) -> Result<DB, String> {
    if exist_cfs.len() + new_cfs_opts.len() == 0 {
        return Err(format!("no column family specified"));
    }

    let exist_cfs_v: Vec<(&str, ColumnFamilyOptions)> = exist_cfs
        .iter()
        .map(|name| (name.as_str(), ColumnFamilyOptions::new()))
        .collect();

    let mut db = DB::open_cf(db_opt, path, exist_cfs_v)?;

    for x in new_cfs_opts {
        let name: &str = x.cf.into();
        db.create_cf((name, x.options))?;
    }

    return Ok(db);
}

#[test]
fn test_open() {
    use tempfile::Builder;

    let tmp_root = Builder::new().tempdir().unwrap();
    let db_path = format!("{}/test", tmp_root.path().display());

    assert!(open(&db_path, false).is_err());

    let db = open(&db_path, true).unwrap();
    assert_eq!(db.path(), db_path);

    let mut cfs = db.cf_names();
    let mut exp: Vec<&str> = vec![DEFAULT_CF];
    for cf in DBColumnFamily::all() {
        exp.push(cf.into());
    }

    cfs.sort();
    exp.sort();
    assert_eq!(cfs, exp);

    drop(db);

    // reopen an existing db without creating.
    let db = open(&db_path, false).unwrap();
    assert_eq!(db.cf_names().len(), exp.len());
}
