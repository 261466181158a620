use std::collections::BTreeSet;
use std::fs;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

use subset_mover::fs_op::listing::list_entries;
use subset_mover::fs_op::mv::move_entry;
use subset_mover::{move_random_subset, select_subset, SubsetError, SubsetRequest};

// A symlink in the source is moved as a link; its target stays put.
#[cfg(unix)]
#[test]
fn symlink_entries_move_as_links() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::symlink;

    let tmp = tempdir()?;
    let outside = tmp.path().join("outside.txt");
    fs::write(&outside, b"hello")?;
    let src = tmp.path().join("src");
    fs::create_dir(&src)?;
    symlink(&outside, src.join("link"))?;

    let dst = tmp.path().join("dst");
    move_random_subset(&SubsetRequest::new(&src, &dst, 1), &mut StdRng::seed_from_u64(1))?;

    let moved = dst.join("link");
    assert!(fs::symlink_metadata(&moved)?.file_type().is_symlink());
    assert_eq!(fs::read_to_string(&moved)?, "hello");
    assert!(outside.exists());
    Ok(())
}

// A dangling symlink is still an entry and can be selected and moved.
#[cfg(unix)]
#[test]
fn dangling_symlink_is_moved() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::symlink;

    let tmp = tempdir()?;
    let src = tmp.path().join("src");
    fs::create_dir(&src)?;
    symlink(tmp.path().join("nowhere"), src.join("dangling"))?;

    let dst = tmp.path().join("dst");
    let report = move_random_subset(&SubsetRequest::new(&src, &dst, 1), &mut StdRng::seed_from_u64(9))?;
    assert_eq!(report.moved, vec![dst.join("dangling")]);
    assert!(fs::symlink_metadata(dst.join("dangling")).is_ok());
    Ok(())
}

// Every valid size partitions the original population.
#[test]
fn every_size_conserves_the_population() -> Result<(), Box<dyn std::error::Error>> {
    let total = 6;
    for n in 0..=total {
        let tmp = tempdir()?;
        let src = tmp.path().join("src");
        fs::create_dir(&src)?;
        for i in 0..total {
            fs::write(src.join(format!("img_{i}.jpg")), format!("{i}"))?;
        }
        let dst = tmp.path().join("dst");

        let report = move_random_subset(
            &SubsetRequest::new(&src, &dst, n as i64),
            &mut StdRng::seed_from_u64(n as u64),
        )?;
        assert_eq!(report.moved.len(), n);

        let left: BTreeSet<_> = fs::read_dir(&src)?.map(|e| e.unwrap().file_name()).collect();
        let taken: BTreeSet<_> = fs::read_dir(&dst)?.map(|e| e.unwrap().file_name()).collect();
        assert_eq!(left.len(), total - n);
        assert_eq!(taken.len(), n);
        assert!(left.is_disjoint(&taken));
        assert_eq!(left.union(&taken).count(), total);
    }
    Ok(())
}

// Different seeds are free to pick different subsets.
#[test]
fn selection_varies_with_the_rng() -> Result<(), Box<dyn std::error::Error>> {
    let mut seen = BTreeSet::new();
    for seed in 0..20u64 {
        let tmp = tempdir()?;
        let src = tmp.path().join("src");
        fs::create_dir(&src)?;
        for name in ["a", "b", "c", "d", "e", "f"] {
            fs::write(src.join(name), name)?;
        }
        let dst = tmp.path().join("dst");
        move_random_subset(&SubsetRequest::new(&src, &dst, 3), &mut StdRng::seed_from_u64(seed))?;
        let picked: BTreeSet<_> = fs::read_dir(&dst)?.map(|e| e.unwrap().file_name()).collect();
        seen.insert(picked);
    }
    assert!(seen.len() > 1, "twenty seeds all chose the same subset");
    Ok(())
}

// An entry removed after listing surfaces as MoveFailed for that entry.
#[test]
fn entry_removed_after_listing_is_move_failed() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let src = tmp.path().join("src");
    fs::create_dir(&src)?;
    fs::write(src.join("was_here.png"), b"x")?;
    let dst = tmp.path().join("dst");
    fs::create_dir(&dst)?;

    let listed = list_entries(&src)?;
    fs::remove_file(src.join("was_here.png"))?;

    let err = move_entry(&listed[0], &dst).unwrap_err();
    assert!(matches!(err, SubsetError::MoveFailed { .. }));
    assert!(err.to_string().contains("was_here.png"));
    Ok(())
}

// A failure partway through stops the run and keeps earlier moves in place.
// The destination lives inside the source, so when it is drawn itself the
// rename into its own subtree fails (EINVAL, even for root).
#[test]
fn failure_midway_does_not_roll_back() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let src = tmp.path().join("src");
    let dst = src.join("subset");
    fs::create_dir_all(&dst)?;
    fs::write(src.join("a.png"), b"a")?;

    // Find a seed that draws the file before the destination directory.
    let population = list_entries(&src)?;
    let seed = (0..64u64)
        .find(|seed| {
            let order = select_subset(&population, 2, &mut StdRng::seed_from_u64(*seed)).unwrap();
            order[0].name == "a.png"
        })
        .expect("some seed draws a.png first");

    let res = move_random_subset(&SubsetRequest::new(&src, &dst, 2), &mut StdRng::seed_from_u64(seed));

    match res {
        Err(SubsetError::MoveFailed { src: from, .. }) => assert_eq!(from, dst),
        other => panic!("expected MoveFailed, got {other:?}"),
    }
    assert_eq!(fs::read(dst.join("a.png"))?, b"a");
    assert!(!src.join("a.png").exists());
    assert!(dst.is_dir());
    Ok(())
}

// Moving onto another filesystem copies each kind of entry and removes the
// original. Skipped when no second filesystem is at hand.
#[cfg(unix)]
#[test]
fn cross_device_move_copies_then_removes() -> Result<(), Box<dyn std::error::Error>> {
    use filetime::FileTime;
    use std::os::unix::fs::{symlink, MetadataExt};
    use std::path::Path;

    let shm = Path::new("/dev/shm");
    if !shm.is_dir() {
        return Ok(());
    }
    let tmp = tempdir()?;
    let far = match tempfile::tempdir_in(shm) {
        Ok(d) => d,
        Err(_) => return Ok(()),
    };
    if fs::metadata(tmp.path())?.dev() == fs::metadata(far.path())?.dev() {
        return Ok(());
    }

    let src = tmp.path().join("src");
    fs::create_dir_all(src.join("album"))?;
    fs::write(src.join("photo.jpg"), b"jpeg")?;
    fs::write(src.join("album/inner.txt"), b"inner")?;
    symlink("photo.jpg", src.join("shortcut"))?;
    let old = FileTime::from_unix_time(1_000_000_000, 0);
    filetime::set_file_mtime(src.join("photo.jpg"), old)?;

    let dst = far.path().join("subset");
    let report = move_random_subset(&SubsetRequest::new(&src, &dst, 3), &mut StdRng::seed_from_u64(3))?;

    assert_eq!(report.moved.len(), 3);
    assert_eq!(fs::read_dir(&src)?.count(), 0);
    assert_eq!(fs::read(dst.join("photo.jpg"))?, b"jpeg");
    let mtime = FileTime::from_last_modification_time(&fs::metadata(dst.join("photo.jpg"))?);
    assert_eq!(mtime.unix_seconds(), old.unix_seconds());
    assert_eq!(fs::read(dst.join("album/inner.txt"))?, b"inner");
    assert_eq!(fs::read_link(dst.join("shortcut"))?, Path::new("photo.jpg"));
    let leftovers = fs::read_dir(&dst)?
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp_subset_copy."))
        .count();
    assert_eq!(leftovers, 0);
    Ok(())
}

// An unreadable source is PermissionDenied. Root ignores mode bits, so the
// check only runs for unprivileged users.
#[cfg(unix)]
#[test]
fn unreadable_source_is_permission_denied() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    if nix::unistd::Uid::effective().is_root() {
        return Ok(());
    }

    let tmp = tempdir()?;
    let src = tmp.path().join("locked");
    fs::create_dir(&src)?;
    fs::write(src.join("a"), b"a")?;
    fs::set_permissions(&src, fs::Permissions::from_mode(0o000))?;

    let res = move_random_subset(
        &SubsetRequest::new(&src, tmp.path().join("dst"), 1),
        &mut StdRng::seed_from_u64(0),
    );
    fs::set_permissions(&src, fs::Permissions::from_mode(0o755))?;

    assert!(matches!(res, Err(SubsetError::PermissionDenied { .. })));
    assert!(!tmp.path().join("dst").exists());
    Ok(())
}

// Moving into an unwritable destination fails and leaves the source intact.
#[cfg(unix)]
#[test]
fn unwritable_destination_leaves_source_intact() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    if nix::unistd::Uid::effective().is_root() {
        return Ok(());
    }

    let tmp = tempdir()?;
    let src = tmp.path().join("src");
    fs::create_dir(&src)?;
    fs::write(src.join("file.txt"), b"data")?;
    let dst = tmp.path().join("dst");
    fs::create_dir(&dst)?;
    fs::set_permissions(&dst, fs::Permissions::from_mode(0o555))?;

    let res = move_random_subset(&SubsetRequest::new(&src, &dst, 1), &mut StdRng::seed_from_u64(0));
    fs::set_permissions(&dst, fs::Permissions::from_mode(0o755))?;

    assert!(matches!(res, Err(SubsetError::MoveFailed { .. })));
    assert!(src.join("file.txt").exists());
    Ok(())
}
