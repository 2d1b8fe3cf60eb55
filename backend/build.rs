use std::fs;
use std::path::Path;

fn main() {
    let out_dir = Path::new("static/dist");
    let dist_dir = Path::new("../frontend/dist");

    if dist_dir.join("index.html").exists() {
        let _ = fs::remove_dir_all(out_dir);
        fs::create_dir_all(out_dir).expect("cannot create static/dist");
        let mut options = fs_extra::dir::CopyOptions::new();
        options.overwrite = true;
        options.content_only = true;
        fs_extra::dir::copy(dist_dir, out_dir, &options).expect("cannot copy frontend/dist");
    } else {
        // include_dir! needs the directory even before the frontend is built.
        fs::create_dir_all(out_dir).expect("cannot create static/dist");
    }
    println!("cargo:rerun-if-changed=../frontend/dist");
}
