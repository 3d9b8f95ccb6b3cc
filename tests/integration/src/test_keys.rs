//! RSA and DSA signature integration tests.

#[cfg(test)]
mod tests {
    use http::Method;
    use httpsig_auth::{
        Algorithm, DigestAlgorithm, RequestSigner, SigningKey, StaticKeyProvider, VerificationKey,
        VerifierConfig,
    };

    use crate::{
        DSA_PRIVATE_PEM, DSA_PUBLIC_PEM, OTHER_RSA_PUBLIC_PEM, RSA_PRIVATE_PEM, RSA_PUBLIC_PEM,
        TestServer,
    };

    async fn server_with_pem(public_pem: &str) -> TestServer {
        let key = VerificationKey::from_pem(public_pem).unwrap();
        let provider = StaticKeyProvider::new(vec![("foo".to_owned(), key)]);
        TestServer::start(provider, VerifierConfig::default())
            .await
            .unwrap()
    }

    fn rsa_signer(digest: DigestAlgorithm) -> RequestSigner {
        RequestSigner::new(
            "foo",
            Algorithm::Rsa(digest),
            SigningKey::from_pem(RSA_PRIVATE_PEM).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_should_verify_valid_rsa_signature() {
        let server = server_with_pem(RSA_PUBLIC_PEM).await;
        let request = server.request(Method::GET, "/").unwrap();

        let (status, body) = server
            .send_signed(request, &rsa_signer(DigestAlgorithm::Sha256))
            .await
            .unwrap();

        assert_eq!(status, 200);
        assert_eq!(body["verified"], true);
        assert_eq!(body["params"]["algorithm"], "rsa-sha256");
    }

    #[tokio::test]
    async fn test_should_not_verify_rsa_with_other_key() {
        let server = server_with_pem(OTHER_RSA_PUBLIC_PEM).await;
        let request = server.request(Method::GET, "/").unwrap();

        let (status, body) = server
            .send_signed(request, &rsa_signer(DigestAlgorithm::Sha256))
            .await
            .unwrap();

        assert_eq!(status, 200);
        assert_eq!(body["verified"], false);
    }

    #[tokio::test]
    async fn test_should_verify_rsa_sha1_over_several_headers() {
        let server = server_with_pem(RSA_PUBLIC_PEM).await;
        let request = server.request(Method::PUT, "/resource?id=7").unwrap();
        let signer =
            rsa_signer(DigestAlgorithm::Sha1).with_headers(["(request-target)", "host", "date"]);

        let (status, body) = server.send_signed(request, &signer).await.unwrap();

        assert_eq!(status, 200);
        assert_eq!(body["verified"], true);
    }

    #[tokio::test]
    async fn test_should_verify_valid_dsa_signature() {
        let server = server_with_pem(DSA_PUBLIC_PEM).await;
        let request = server.request(Method::GET, "/").unwrap();
        let signer = RequestSigner::new(
            "foo",
            Algorithm::Dsa(DigestAlgorithm::Sha1),
            SigningKey::from_pem(DSA_PRIVATE_PEM).unwrap(),
        );

        let (status, body) = server.send_signed(request, &signer).await.unwrap();

        assert_eq!(status, 200);
        assert_eq!(body["verified"], true);
        assert_eq!(body["params"]["algorithm"], "dsa-sha1");
    }

    #[tokio::test]
    async fn test_should_refuse_rsa_signature_against_dsa_key() {
        let server = server_with_pem(DSA_PUBLIC_PEM).await;
        let request = server.request(Method::GET, "/").unwrap();

        let (status, body) = server
            .send_signed(request, &rsa_signer(DigestAlgorithm::Sha256))
            .await
            .unwrap();

        assert_eq!(status, 401);
        assert_eq!(body["error"], "AlgorithmKeyMismatch");
    }
}
