//! G3D container codec.
//!
//! A G3D file is a [BFAST](crate::bfast) container whose first segment is the
//! 8-byte `meta` header, followed by one segment per attribute named by its
//! descriptor string. Readers drop segments they cannot name.

mod reader;
mod writer;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::geometry::GeometryAttributes;
use crate::schema::VimAttributes;
use crate::util::{Error, Result};

use reader::read_container;
use writer::write_container;

/// Write a geometry to `writer`. Returns the number of bytes written.
pub fn write_geometry<W: Write>(geometry: &GeometryAttributes, writer: W) -> Result<u64> {
    write_container(writer, geometry.header(), geometry.attributes())
}

pub fn geometry_to_bytes(geometry: &GeometryAttributes) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_geometry(geometry, &mut buf)?;
    Ok(buf)
}

pub fn write_geometry_file(geometry: &GeometryAttributes, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    write_geometry(geometry, BufWriter::new(file))?;
    Ok(())
}

/// Read a geometry and derive its counts.
pub fn read_geometry<R: Read>(reader: R) -> Result<GeometryAttributes> {
    read_geometry_sized(reader, None)
}

pub fn geometry_from_bytes(bytes: &[u8]) -> Result<GeometryAttributes> {
    read_geometry_sized(bytes, Some(bytes.len() as u64))
}

fn read_geometry_sized<R: Read>(reader: R, len: Option<u64>) -> Result<GeometryAttributes> {
    let (header, attributes) = read_container(reader, len)?;
    GeometryAttributes::with_header(attributes, header)
}

/// Read a geometry file, memory-mapped when the `mmap` feature is on.
pub fn read_geometry_file(path: impl AsRef<Path>) -> Result<GeometryAttributes> {
    read_geometry_file_opts(path, cfg!(feature = "mmap"))
}

/// Read a geometry file with optional memory mapping.
pub fn read_geometry_file_opts(path: impl AsRef<Path>, use_mmap: bool) -> Result<GeometryAttributes> {
    with_file(path.as_ref(), use_mmap, |r, len| read_geometry_sized(r, Some(len)))
}

impl VimAttributes {
    /// Write all occupied slots. Returns the number of bytes written.
    pub fn write<W: Write>(&self, writer: W) -> Result<u64> {
        write_container(writer, self.header(), self.attributes().map(|(_, a)| a))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write(&mut buf)?;
        Ok(buf)
    }

    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        self.write(BufWriter::new(file))?;
        Ok(())
    }

    /// Read a container, keeping attributes that match a slot.
    pub fn read<R: Read>(reader: R) -> Result<Self> {
        Self::read_sized(reader, None)
    }

    fn read_sized<R: Read>(reader: R, len: Option<u64>) -> Result<Self> {
        let (header, attributes) = read_container(reader, len)?;
        let mut vim = Self::with_header(header);
        for attr in attributes {
            if let Err(attr) = vim.insert(attr) {
                debug!(attribute = %attr.name(), "dropping attribute outside the VIM schema");
            }
        }
        Ok(vim)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read_sized(bytes, Some(bytes.len() as u64))
    }

    pub fn read_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::read_file_opts(path, cfg!(feature = "mmap"))
    }

    pub fn read_file_opts(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        with_file(path.as_ref(), use_mmap, |r, len| Self::read_sized(r, Some(len)))
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })
}

/// Run `read` over the file's bytes, mapped or buffered, along with the
/// file size.
fn with_file<T>(
    path: &Path,
    use_mmap: bool,
    read: impl FnOnce(&mut dyn Read, u64) -> Result<T>,
) -> Result<T> {
    let file = open(path)?;
    let len = file.metadata()?.len();

    #[cfg(feature = "mmap")]
    if use_mmap && len > 0 {
        // Safety: the file is opened read-only and the map is dropped before returning.
        let mmap = unsafe { memmap2::Mmap::map(&file) }
            .map_err(|e| Error::MmapFailed(e.to_string()))?;
        return read(&mut &mmap[..], mmap.len() as u64);
    }

    #[cfg(not(feature = "mmap"))]
    if use_mmap {
        debug!(path = %path.display(), "built without mmap, using buffered read");
    }

    read(&mut BufReader::new(file), len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Attribute;
    use crate::bfast::{write_segments, Segment};
    use crate::descriptor::common;
    use crate::geometry::{MetaHeader, Unit, UpAxis};
    use crate::schema::Slot;
    use crate::util::Vec3;

    fn triangle() -> GeometryAttributes {
        GeometryAttributes::new(vec![
            Attribute::from_data(
                common::position(),
                &[Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 1.0)],
            )
            .unwrap(),
            Attribute::from_data(common::index(), &[0i32, 1, 2]).unwrap(),
            Attribute::from_data(common::corners_per_face(), &[3i32]).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let header = MetaHeader { unit: Unit::Centimeter, up_axis: UpAxis::Y, ..Default::default() };
        let g = triangle().with_meta_header(header);
        let bytes = geometry_to_bytes(&g).unwrap();
        let r = geometry_from_bytes(&bytes).unwrap();

        assert_eq!(r.header(), &header);
        assert_eq!(r.num_vertices(), 3);
        assert_eq!(r.num_corners(), 3);
        assert_eq!(r.num_faces(), 1);
        assert_eq!(r.vertices(), g.vertices());
        assert_eq!(r.indices(), g.indices());
        for attr in g.attributes() {
            assert_eq!(r.attribute_by_descriptor(attr.descriptor()), Some(attr));
        }
    }

    #[test]
    fn test_segments_are_sorted_after_meta() {
        let bytes = geometry_to_bytes(&triangle()).unwrap();
        let names = crate::bfast::read_segments(bytes.as_slice(), |_, name, _| {
            Ok(Some(name.to_string()))
        })
        .unwrap();
        assert_eq!(names[0], "meta");
        let mut sorted = names[1..].to_vec();
        sorted.sort();
        assert_eq!(names[1..], sorted[..]);
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_missing_meta() {
        let mut buf = Vec::new();
        let index = 0i32.to_le_bytes();
        write_segments(&mut buf, &[Segment::new("g3d:corner:index:0:int32:1", &index)]).unwrap();
        assert!(matches!(geometry_from_bytes(&buf), Err(Error::MissingMetaHeader)));
    }

    #[test]
    fn test_bad_meta_is_fatal() {
        let mut meta = MetaHeader::default().to_bytes();
        meta[1] = 0;
        let mut buf = Vec::new();
        write_segments(&mut buf, &[Segment::new("meta", &meta)]).unwrap();
        assert!(matches!(geometry_from_bytes(&buf), Err(Error::InvalidMetaHeader(_))));
    }

    #[test]
    fn test_duplicate_descriptor_rejected() {
        let g = triangle();
        let mut attrs = g.attributes().to_vec();
        attrs.push(attrs[0].clone());
        let mut buf = Vec::new();
        assert!(write_container(&mut buf, g.header(), &attrs).is_err());
    }

    #[test]
    fn test_repeated_descriptor_round_trips() {
        let normals = |n: Vec3| Attribute::from_data(common::vertex_normal(), &[n; 3]).unwrap();
        let g = triangle().add_attributes([normals(Vec3::X), normals(Vec3::Y)]).unwrap();
        let r = geometry_from_bytes(&geometry_to_bytes(&g).unwrap()).unwrap();
        assert_eq!(r.attributes().len(), g.attributes().len());
        assert_eq!(r.vertex_normals(), Some(&[Vec3::X; 3][..]));
    }

    #[test]
    fn test_vim_round_trip_drops_foreign_attributes() {
        let vim = crate::schema::tests::fixture();
        let bytes = vim.to_bytes().unwrap();
        assert_eq!(VimAttributes::from_bytes(&bytes).unwrap(), vim);

        // An open geometry read as VIM keeps only the slots it fills.
        let g = triangle()
            .add_attributes([Attribute::from_data(common::vertex_normal(), &[Vec3::Z; 3]).unwrap()])
            .unwrap();
        let vim = VimAttributes::from_bytes(&geometry_to_bytes(&g).unwrap()).unwrap();
        assert_eq!(vim.attributes().count(), 3);
        assert!(vim.get(Slot::Vertex).is_some());
    }

    #[test]
    fn test_file_not_found() {
        let err = read_geometry_file("/nonexistent/dir/file.g3d").unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }
}
