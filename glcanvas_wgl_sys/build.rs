use std::env;
use std::fs::File;
use std::path::PathBuf;

use gl_generator::{Api, Fallbacks, Profile, Registry, StaticGenerator, StructGenerator};

fn main() {
    let target = env::var("TARGET").unwrap();
    let dest = PathBuf::from(&env::var("OUT_DIR").unwrap());

    println!("cargo:rerun-if-changed=build.rs");

    if target.contains("windows") {
        let mut file = File::create(dest.join("wgl_bindings.rs")).unwrap();
        Registry::new(Api::Wgl, (1, 0), Profile::Core, Fallbacks::All, [])
            .write_bindings(StaticGenerator, &mut file)
            .unwrap();

        // Entry points that have to be queried through wglGetProcAddress with
        // a current context, hence the struct generator.
        let mut file = File::create(dest.join("wgl_extra_bindings.rs")).unwrap();
        Registry::new(
            Api::Wgl,
            (1, 0),
            Profile::Core,
            Fallbacks::All,
            [
                "WGL_ARB_create_context",
                "WGL_ARB_create_context_profile",
                "WGL_ARB_extensions_string",
                "WGL_ARB_multisample",
                "WGL_ARB_pixel_format",
                "WGL_EXT_extensions_string",
            ],
        )
        .write_bindings(StructGenerator, &mut file)
        .unwrap();
    }
}
