//! Generated credentials for admin-created accounts.
//!
//! Students and lecturers do not pick their own usernames: the platform
//! issues a registration number and a random initial password, returned once
//! in the create response.

use rand::Rng;

/// Characters used for generated passwords (unambiguous alphanumerics).
const PASSWORD_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789";

/// Length of generated initial passwords.
const PASSWORD_LEN: usize = 10;

/// Registration-number prefix for students.
pub const STUDENT_PREFIX: &str = "std";

/// Registration-number prefix for lecturers.
pub const LECTURER_PREFIX: &str = "lec";

/// Generate a registration number like `std/26/48213`.
pub fn registration_number(prefix: &str, year: i32) -> String {
    let mut rng = rand::rng();
    let serial: u32 = rng.random_range(10_000..100_000);
    format!("{prefix}/{:02}/{serial}", year % 100)
}

/// Generate a random initial password.
pub fn random_password() -> String {
    let mut rng = rand::rng();
    (0..PASSWORD_LEN)
        .map(|_| PASSWORD_CHARSET[rng.random_range(0..PASSWORD_CHARSET.len())] as char)
        .collect()
}
