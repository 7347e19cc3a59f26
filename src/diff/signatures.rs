use md5::Context;

use crate::source::SourceImage;

/// Content digest of a single pixel band. Identical pixel sequences hash
/// identically; an empty band hashes to the empty-input digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; 16]);

pub fn column_signatures(img: &SourceImage) -> Vec<Signature> {
    (0..img.width())
        .map(|x| {
            let mut ctx = Context::new();
            for y in 0..img.height() {
                let p = img.rgb().get_pixel(x, y);
                ctx.consume([p[0], p[1], p[2]]);
            }
            Signature(ctx.compute().0)
        })
        .collect()
}

/// Row digests restricted to `[min_x, min_x + width)`, which must lie within
/// the image.
pub fn row_signatures(img: &SourceImage, min_x: u32, width: u32) -> Vec<Signature> {
    (0..img.height())
        .map(|y| {
            let mut ctx = Context::new();
            for x in min_x..min_x + width {
                let p = img.rgb().get_pixel(x, y);
                ctx.consume([p[0], p[1], p[2]]);
            }
            Signature(ctx.compute().0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    fn img(width: u32, height: u32, f: impl Fn(u32, u32) -> Rgb<u8>) -> SourceImage {
        SourceImage::from_rgb(RgbImage::from_fn(width, height, f), "test.png")
    }

    #[test]
    fn identical_columns_hash_identically() {
        let a = img(3, 4, |x, y| Rgb([x as u8, y as u8, 7]));
        let b = img(3, 4, |x, y| Rgb([x as u8, y as u8, 7]));
        assert_eq!(column_signatures(&a), column_signatures(&b));
    }

    #[test]
    fn single_pixel_changes_its_column_only() {
        let a = img(3, 4, |_, _| Rgb([10, 10, 10]));
        let b = img(3, 4, |x, y| {
            if (x, y) == (1, 2) {
                Rgb([11, 10, 10])
            } else {
                Rgb([10, 10, 10])
            }
        });
        let sa = column_signatures(&a);
        let sb = column_signatures(&b);
        assert_eq!(sa[0], sb[0]);
        assert_ne!(sa[1], sb[1]);
        assert_eq!(sa[2], sb[2]);
    }

    #[test]
    fn empty_band_digest_is_distinct() {
        let empty = img(2, 0, |_, _| Rgb([0, 0, 0]));
        let one = img(2, 1, |_, _| Rgb([0, 0, 0]));
        let se = column_signatures(&empty);
        let so = column_signatures(&one);
        assert_eq!(se[0], se[1]);
        assert_ne!(se[0], so[0]);
    }

    #[test]
    fn row_signatures_cover_only_the_requested_range() {
        let a = img(6, 3, |x, y| Rgb([x as u8, y as u8, 0]));
        let b = img(6, 3, |x, y| {
            if x == 5 {
                Rgb([99, 99, 99])
            } else {
                Rgb([x as u8, y as u8, 0])
            }
        });
        assert_eq!(row_signatures(&a, 0, 5), row_signatures(&b, 0, 5));
        assert_ne!(row_signatures(&a, 0, 6), row_signatures(&b, 0, 6));
    }
}
