/// Integration tests.
/// See individual source files in the src dir for
/// unittest confined to a single module.
use linalg_rs::*;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use faer_ext::{IntoFaer, IntoNdarray};
    use ndarray::{arr2, Array2, ArrayView2};
    use linalg_rs::lib_linalg::mat_utils::random_mat_normal;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn random_array(n_rows: usize, n_cols: usize) -> Array2<f64> {
        random_mat_normal::<f64>(n_rows, n_cols).as_ref().into_ndarray().to_owned()
    }

    fn matmul(a: ArrayView2<f64>, b: ArrayView2<f64>) -> Array2<f64> {
        a.dot(&b)
    }

    fn assert_close(a: ArrayView2<f64>, b: ArrayView2<f64>, tol: f64) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_approx_eq!(*x, *y, tol);
        }
    }

    #[test]
    fn test_pinv_shape() {
        init_logging();
        let cfg = LinalgConfig::default();
        for (m, n) in [(1, 1), (2, 5), (5, 2), (7, 7), (30, 4)] {
            let a = random_array(m, n);
            let b = pinv(a.view(), &cfg).unwrap();
            assert_eq!(b.dim(), (n, m));
        }
    }

    #[test]
    fn test_pinv_square_inverse() {
        init_logging();
        // diagonally dominant, so full rank
        let mut a = random_array(6, 6);
        for i in 0..6 {
            a[[i, i]] += 10.0;
        }
        let a_pinv = pinv(a.view(), &LinalgConfig::default()).unwrap();
        let eye: Array2<f64> = Array2::eye(6);
        assert_close(matmul(a_pinv.view(), a.view()).view(), eye.view(), 1.0e-10);
        assert_close(matmul(a.view(), a_pinv.view()).view(), eye.view(), 1.0e-10);
    }

    #[test]
    fn test_pinv_penrose_conditions() {
        init_logging();
        let cfg = LinalgConfig::default().with_rcond(Some(1.0e-10)).unwrap();
        // rank 2 matrix of shape (6, 4)
        let left = random_array(6, 2);
        let right = random_array(2, 4);
        let a = matmul(left.view(), right.view());
        let a_pinv = pinv(a.view(), &cfg).unwrap();

        let aa_a = matmul(matmul(a.view(), a_pinv.view()).view(), a.view());
        assert_close(aa_a.view(), a.view(), 1.0e-8);
        let a_aa = matmul(matmul(a_pinv.view(), a.view()).view(), a_pinv.view());
        assert_close(a_aa.view(), a_pinv.view(), 1.0e-8);

        // A A+ and A+ A are symmetric
        let p = matmul(a.view(), a_pinv.view());
        assert_close(p.view(), p.t(), 1.0e-8);
        let q = matmul(a_pinv.view(), a.view());
        assert_close(q.view(), q.t(), 1.0e-8);
    }

    #[test]
    fn test_solve_shape() {
        init_logging();
        let a = random_array(8, 3);
        let b = random_array(8, 5);
        let x = solve(a.view(), b.view(), &LinalgConfig::default()).unwrap();
        assert_eq!(x.dim(), (3, 5));
    }

    #[test]
    fn test_solve_recovers_exact() {
        init_logging();
        let a = random_array(10, 4);
        let x_true = random_array(4, 2);
        let b = matmul(a.view(), x_true.view());
        let x = solve(a.view(), b.view(), &LinalgConfig::default()).unwrap();
        assert_close(x.view(), x_true.view(), 1.0e-8);
    }

    #[test]
    fn test_solve_matches_normal_equations() {
        init_logging();
        let cfg = LinalgConfig::default();
        let a = random_array(12, 3);
        let b = random_array(12, 1);
        let x = solve(a.view(), b.view(), &cfg).unwrap();
        // x = (A^T A)^-1 A^T b for full column rank A
        let ata = matmul(a.t(), a.view());
        let atb = matmul(a.t(), b.view());
        let x_ne = matmul(pinv(ata.view(), &cfg).unwrap().view(), atb.view());
        assert_close(x.view(), x_ne.view(), 1.0e-8);
    }

    #[test]
    fn test_solve_agrees_with_pinv() {
        init_logging();
        let cfg = LinalgConfig::default();
        let a = random_array(5, 7);
        let b = random_array(5, 3);
        let x = solve(a.view(), b.view(), &cfg).unwrap();
        let x_pinv = matmul(pinv(a.view(), &cfg).unwrap().view(), b.view());
        assert_close(x.view(), x_pinv.view(), 1.0e-10);
    }

    #[test]
    fn test_f32_matches_f64() {
        init_logging();
        let cfg = LinalgConfig::default();
        let a64 = arr2(&[[2.0, 1.0], [1.0, 3.0], [0.0, 1.0]]);
        let a32 = a64.mapv(|v| v as f32);
        let b64 = pinv(a64.view(), &cfg).unwrap();
        let b32 = pinv(a32.view(), &cfg).unwrap();
        for (x, y) in b64.iter().zip(b32.iter()) {
            assert_approx_eq!(*x as f32, *y, 1.0e-5f32);
        }
    }

    #[test]
    fn test_faer_and_ndarray_paths_agree() {
        init_logging();
        let a = random_array(6, 3);
        let b = random_array(6, 2);
        let cfg = LinalgConfig::default().with_threads(Some(1));
        let x_nd = solve(a.view(), b.view(), &cfg).unwrap();
        let x_faer = mat_solve(a.view().into_faer(), b.view().into_faer(), None, cfg.parallelism()).unwrap();
        assert_close(x_nd.view(), x_faer.as_ref().into_ndarray(), 1.0e-12);
    }

    #[test]
    fn test_printmat_does_not_mutate() {
        init_logging();
        let a = random_array(3, 4);
        let before = a.clone();
        printmat(a.view()).unwrap();
        assert_eq!(a, before);
        assert_eq!(format_mat(a.view()).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_rank1_input_rejected() {
        init_logging();
        let v = ndarray::arr1(&[1.0, 2.0]);
        let cfg = LinalgConfig::default();
        let err = pinv(v.view(), &cfg).unwrap_err();
        assert_eq!(err.to_string(), "expected a 2-d array, got a 1-d array");
        assert!(solve(v.view(), v.view(), &cfg).is_err());
    }
}
