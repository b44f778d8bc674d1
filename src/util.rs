use rand::Rng;

pub fn random_digits<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        let digit = rng.gen_range(0..10);
        out.push(char::from(b'0' + digit as u8));
    }
    out
}

pub fn random_upper_letters<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        let idx = rng.gen_range(0..CHARSET.len());
        out.push(char::from(CHARSET[idx]));
    }
    out
}

pub fn random_upper_letter<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(rng.gen_range(b'A'..=b'Z'))
}

/// Uniform draw from `0..=max`, left-padded with zeros to `width`.
pub fn random_padded_number<R: Rng + ?Sized>(rng: &mut R, max: u64, width: usize) -> String {
    let value = rng.gen_range(0..=max);
    format!("{:0width$}", value, width = width)
}
