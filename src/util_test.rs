use super::*;

#[test]
fn test_os_page_size() {
    let page_size = os_page_size();
    println!("test_os_page_size {}", page_size);

    assert!(page_size >= 4096, "{}", page_size);
    assert!(page_size.is_power_of_two(), "{}", page_size);
}

#[test]
fn test_page_depth() {
    assert_eq!(page_depth(64), 4);
    assert_eq!(page_depth(256), 6);
    assert_eq!(page_depth(4096), 10);
    assert_eq!(page_depth(16384), 12);
    assert_eq!(page_depth(2 * 1024 * 1024), 19);

    for depth in 1..20 {
        let page_size = os_page_size();
        if page_depth(page_size) == depth {
            assert!(((1_usize << depth) - 1) * 4 <= page_size);
            assert!(((1_usize << (depth + 1)) - 1) * 4 > page_size);
        }
    }
}

#[test]
fn test_aligned_buf() {
    for (len, align) in vec![(1, 64), (3, 64), (15, 64), (1023, 4096), (1024, 4096)] {
        let mut buf = AlignedBuf::new(len, align).unwrap();
        assert_eq!(buf.as_slice().len(), len);
        assert_eq!(buf.to_align(), align);
        assert_eq!(buf.ptr.as_ptr() as usize % align, 0, "len {}", len);
        assert!(buf.footprint() >= len * 4 + 16, "{} {}", buf.footprint(), len);
        assert_eq!(buf.footprint() % 64, 16, "{}", buf.footprint());

        assert!(buf.as_slice().iter().all(|&slot| slot == 0));
        for (i, slot) in buf.as_mut_slice().iter_mut().enumerate() {
            *slot = i as i32;
        }
        assert!(buf.as_slice().iter().enumerate().all(|(i, &s)| s == i as i32));
    }
}
