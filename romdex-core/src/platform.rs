//! Platform-name equivalence.
//!
//! Catalogs, filenames, and users all spell platforms differently ("Mega
//! Drive" vs "Genesis", "snes" vs "Super Nintendo"). Matching is by
//! normalized equality plus a fixed table of alias groups; two names are
//! equivalent iff they normalize identically or share a group.

/// Alias groups. Every name inside a group refers to the same platform;
/// names are stored pre-normalized (lowercase, single spaces).
const ALIAS_GROUPS: &[&[&str]] = &[
    // Nintendo
    &["nes", "famicom", "fc", "nintendo entertainment system"],
    &[
        "snes",
        "sfc",
        "super famicom",
        "super nintendo",
        "super nintendo entertainment system",
    ],
    &["n64", "nintendo 64", "nintendo64"],
    &["gamecube", "nintendo gamecube", "ngc", "gcn", "gc"],
    &["wii", "nintendo wii"],
    &["wiiu", "wii u", "nintendo wii u"],
    &["gb", "gameboy", "game boy"],
    &["gbc", "gameboy color", "game boy color"],
    &["gba", "gameboy advance", "game boy advance"],
    &["nds", "ds", "nintendo ds"],
    &["3ds", "nintendo 3ds", "n3ds"],
    // Sega
    &["sg1000", "sg-1000"],
    &["sms", "mastersystem", "master system", "sega master system"],
    &[
        "genesis",
        "megadrive",
        "mega drive",
        "sega genesis",
        "sega mega drive",
        "md",
    ],
    &["segacd", "sega cd", "megacd", "mega cd"],
    &["32x", "sega 32x", "sega32x"],
    &["saturn", "sega saturn"],
    &["dreamcast", "sega dreamcast", "dc"],
    &["gamegear", "game gear", "gg"],
    // Sony
    &["ps1", "psx", "playstation", "playstation 1", "sony playstation"],
    &["ps2", "playstation 2", "sony playstation 2"],
    &["ps3", "playstation 3", "sony playstation 3"],
    &["psp", "playstation portable", "sony psp"],
    &["vita", "psvita", "ps vita", "playstation vita"],
    // Microsoft
    &["xbox", "microsoft xbox"],
    &["xbox360", "xbox 360", "x360"],
    // Home computers
    &["amiga", "commodore amiga"],
    &["cd32", "amiga cd32"],
    &["c64", "commodore 64", "commodore64"],
    &["vic20", "vic-20", "commodore vic-20"],
    &["amstradcpc", "amstrad cpc", "cpc"],
    &["zxspectrum", "zx spectrum", "sinclair zx spectrum", "spectrum"],
    &["atarist", "atari st"],
    &["dos", "ms-dos", "msdos"],
    // 8/16-bit consoles and handhelds
    &["atari2600", "atari 2600", "vcs"],
    &["atari7800", "atari 7800"],
    &["lynx", "atari lynx"],
    &["jaguar", "atari jaguar"],
    &[
        "pcengine",
        "pc engine",
        "turbografx-16",
        "turbografx 16",
        "tg16",
    ],
    &["neogeo", "neo geo", "neo-geo", "neogeo aes"],
    &["ngp", "neo geo pocket", "neogeo pocket"],
    &["wonderswan", "wonder swan"],
];

/// Lowercase, trim, collapse runs of whitespace to single spaces.
fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// True iff the two names refer to the same platform.
pub fn names_match(a: &str, b: &str) -> bool {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b {
        return true;
    }
    ALIAS_GROUPS
        .iter()
        .any(|group| group.contains(&a.as_str()) && group.contains(&b.as_str()))
}
