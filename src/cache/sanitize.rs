//! Filename slugs for cache entries.
//!
//! A slug keeps cache filenames readable: `Café Déjà.JPG` becomes
//! `cafe-deja`. The slug alone is not unique, the fingerprint segment of the
//! cache key disambiguates sources that slug to the same text.

/// Turn an arbitrary file path or name into a lowercase ASCII slug.
///
/// Directory and final extension are dropped and accented Latin letters are
/// transliterated. ASCII punctuation that is awkward in filenames or URLs
/// becomes a separator; `~`, `` ` `` and `^` are kept as is. Control
/// characters and non-ASCII outside the table are removed. Separators are
/// emitted as a single hyphen and never lead or trail the slug.
pub fn sanitize(filename: &str) -> String {
    let stem = file_stem(filename).to_lowercase();

    let mut words = String::with_capacity(stem.len());
    for c in stem.chars() {
        if let Some(mapped) = transliterate(c) {
            words.push(mapped);
        } else if c.is_ascii_graphic() || c == ' ' {
            words.push(c);
        }
    }

    let mut slug = String::with_capacity(words.len());
    for c in words.trim().chars() {
        let c = if c == ' ' { '-' } else { c };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }

    slug
}

#[cfg(windows)]
const SEPARATORS: &[char] = &['/', '\\'];

#[cfg(not(windows))]
const SEPARATORS: &[char] = &['/'];

/// Final path component. `\` only separates components on Windows.
pub(crate) fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(SEPARATORS);
    match trimmed.rfind(SEPARATORS) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Base name without its final extension. Dotfiles keep their name.
fn file_stem(path: &str) -> &str {
    let base = base_name(path);
    match base.rfind('.') {
        Some(idx) if idx > 0 => &base[..idx],
        _ => base,
    }
}

/// Fixed transliteration table, applied after lowercasing.
///
/// Letters map to their unaccented ASCII form; ASCII punctuation and a few
/// Latin-1 symbols map to a space so they end up as word separators.
fn transliterate(c: char) -> Option<char> {
    let mapped = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'æ' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ð' | 'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ğ' => 'g',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => 'i',
        'ł' | 'ľ' => 'l',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' | 'œ' => 'o',
        'ŕ' | 'ř' => 'r',
        'ß' | 'ś' | 'š' | 'ş' | 'ș' => 's',
        'þ' | 'ť' | 'ţ' | 'ț' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        '"' | '!' | '@' | '#' | '$' | '%' | '&' | '*' | '(' | ')' | '_' | '-' | '+' | '='
        | '{' | '[' | '}' | ']' | '/' | '?' | ';' | ':' | '.' | ',' | '\\' | '\'' | '<'
        | '>' | '|' | '°' | 'º' | 'ª' => ' ',
        _ => return None,
    };
    Some(mapped)
}
