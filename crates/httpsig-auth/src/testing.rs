//! Shared fixtures for unit tests.

use chrono::{DateTime, TimeZone, Utc};

pub(crate) const HMAC_SECRET: &str = "s3cr3t";
pub(crate) const TEST_DATE: &str = "Tue, 07 Jun 2011 20:51:35 GMT";

pub(crate) const TEST_DATE_HMAC_SHA1: &str = "fjHgZR3SrwJxDkG3mGQW9Rl1ZZo=";
pub(crate) const TEST_DATE_HMAC_SHA256: &str = "xAvmOTTgY8S4fddZu4F79Y+2ZB/EuIp7kEnlFdtbZbY=";
pub(crate) const TEST_DATE_RSA_SHA256: &str = "dHcfEaQ2u5FQAxDPOMsswvGVSPWMiXcvf+z17Cp3SZtLmgZkcF+YEjn4TtW++MRFdiOys6HvbwLdEjR+oD4iJk0MJejRgop4jF5ushTDvgKKP+DtBOLldy3XHyh5btBqjldgo4zSc/aJ2Q6J7nb7rrVWFNwNYxgXhXDNQzgx7ZiEb+YliJqpzC82iK1kMe0FRMp4rN7jugwMTvUx360uSpuhVVtUeraOmbWja2zIshyb7GJAYV5SEEKMjwQ9jw0XTBruTEYDoDFJstYBcHsEAY5eqviiWq4bjeplI8Ejy9WORAUHpk6Kcaqol1i+QM2aF2NXVLscuWUkshWTtJarhA==";
pub(crate) const TEST_DATE_RSA_SHA1: &str = "WObPtium2a8lvR2vkXuF7kK258KeQ7SvSXgGQ2P2d84OitYN1XgKyA4tBPre5h2DSUvv5Pl9w6iKADkC+layo3p0cxnmXlb9yVOBw0ENF6/2YxxuO9ISmPyX+RD4b/p5ZnyL9G3hzfjm8l5rsZjLLwm6g0UKlc8a0le01wxFH12Eoo2PwxFHDm+jblIDW6mP5j4OjIJsKham8S90h9C7tbqwS4Ex1L1YqnnNHf1NgrSvvqNdZuoUaHkkEbTkC23QZRvyRSvmZNXescnhiiyjC6DOBdQUaA+CtcBHBeAcMzqeeo0MoRWBCi0++5+W671d+WRIqIw3CPRlBHGPo7Bb6g==";
pub(crate) const TEST_DATE_DSA_SHA1: &str =
    "MC0CFC2SkPXt5He3349U1zFQCdN70gR6AhUAiHu2N6zxqVBhAZM/k0JGkPCyZWs=";

pub(crate) const RSA_PUBLIC_PEM: &str = include_str!("../testdata/rsa_public.pem");
pub(crate) const RSA_PUBLIC_PKCS1_PEM: &str = include_str!("../testdata/rsa_public_pkcs1.pem");
pub(crate) const RSA_PRIVATE_PEM: &str = include_str!("../testdata/rsa_private.pem");
pub(crate) const OTHER_RSA_PUBLIC_PEM: &str = include_str!("../testdata/other_rsa_public.pem");
pub(crate) const DSA_PUBLIC_PEM: &str = include_str!("../testdata/dsa_public.pem");
pub(crate) const DSA_PRIVATE_PEM: &str = include_str!("../testdata/dsa_private.pem");

/// The instant `TEST_DATE` names.
pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2011, 6, 7, 20, 51, 35).unwrap()
}
