// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to handle writing out image cubes.

mod error;

pub use error::{FileWriteError, ImageWriteError};

use std::path::Path;

use fitsio::{
    hdu::FitsHdu,
    headers::WritesKey,
    images::{ImageDescription, ImageType},
    FitsFile,
};
use log::{debug, trace};

use crate::{cli::Warn, image::ImageCube, io::read::FitsError};

/// Write an image cube to a FITS file, overwriting it if it already exists.
/// The pixels go into the primary HDU.
pub fn write_image_cube<P: AsRef<Path>>(image: &ImageCube, file: P) -> Result<(), ImageWriteError> {
    let file = file.as_ref();
    can_write_to_file(file)?;
    debug!("Writing image {}", file.display());

    // fitsio wants the dimensions slowest-varying first, which is how the
    // data array is already laid out.
    let dimensions = image.data.shape().to_vec();
    let mut fptr = fits_create(
        file,
        &ImageDescription {
            data_type: ImageType::Float,
            dimensions: &dimensions,
        },
    )?;
    let hdu = fptr.primary_hdu().map_err(|e| fitsio_error(e, &fptr))?;

    for (i, axis) in image.axes.iter().enumerate() {
        let n = i + 1;
        fits_write_key(&mut fptr, &hdu, &format!("CTYPE{n}"), axis.ctype.as_str())?;
        fits_write_key(&mut fptr, &hdu, &format!("CRVAL{n}"), axis.crval)?;
        fits_write_key(&mut fptr, &hdu, &format!("CDELT{n}"), axis.cdelt)?;
        fits_write_key(&mut fptr, &hdu, &format!("CRPIX{n}"), axis.crpix)?;
        if let Some(cunit) = axis.cunit.as_deref() {
            fits_write_key(&mut fptr, &hdu, &format!("CUNIT{n}"), cunit)?;
        }
    }

    let meta = &image.meta;
    if let Some(rest_freq) = meta.rest_freq {
        fits_write_key(&mut fptr, &hdu, "RESTFRQ", rest_freq)?;
    }
    if let Some(beam) = meta.beam {
        fits_write_key(&mut fptr, &hdu, "BMAJ", beam.major_deg)?;
        fits_write_key(&mut fptr, &hdu, "BMIN", beam.minor_deg)?;
        fits_write_key(&mut fptr, &hdu, "BPA", beam.pa_deg)?;
    }
    if let Some(bunit) = meta.bunit.as_deref() {
        fits_write_key(&mut fptr, &hdu, "BUNIT", bunit)?;
    }
    if let Some(object) = meta.object.as_deref() {
        fits_write_key(&mut fptr, &hdu, "OBJECT", object)?;
    }
    if let Some(equinox) = meta.equinox {
        fits_write_key(&mut fptr, &hdu, "EQUINOX", equinox)?;
    }
    if let Some(specsys) = meta.specsys.as_deref() {
        fits_write_key(&mut fptr, &hdu, "SPECSYS", specsys)?;
    }
    fits_write_key(
        &mut fptr,
        &hdu,
        "SOFTWARE",
        format!(
            "Created by {} v{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ),
    )?;
    fits_write_key(&mut fptr, &hdu, "ORIGIN", "feathered image pipeline")?;

    // Iterating over a standard-layout array gives FITS memory order.
    let pixels: Vec<f32> = image.data.iter().copied().collect();
    hdu.write_image(&mut fptr, &pixels)
        .map_err(|e| fitsio_error(e, &fptr))?;
    trace!("Wrote {} pixels to {}", pixels.len(), file.display());

    Ok(())
}

/// Create a new FITS file with an image in its primary HDU. An existing file
/// is overwritten.
#[track_caller]
fn fits_create(file: &Path, description: &ImageDescription) -> Result<FitsFile, FitsError> {
    FitsFile::create(file)
        .with_custom_primary(description)
        .overwrite()
        .open()
        .map_err(|e| {
            let caller = std::panic::Location::caller();
            FitsError::Create {
                fits_error: Box::new(e),
                fits_filename: file.to_path_buf().into_boxed_path(),
                source_file: caller.file(),
                source_line: caller.line(),
                source_column: caller.column(),
            }
        })
}

#[track_caller]
fn fits_write_key<T: WritesKey>(
    fptr: &mut FitsFile,
    hdu: &FitsHdu,
    key: &str,
    value: T,
) -> Result<(), FitsError> {
    hdu.write_key(fptr, key, value).map_err(|e| {
        let caller = std::panic::Location::caller();
        FitsError::WriteKey {
            key: key.to_string().into_boxed_str(),
            fits_error: Box::new(e),
            fits_filename: fptr.file_path().to_path_buf().into_boxed_path(),
            source_file: caller.file(),
            source_line: caller.line(),
            source_column: caller.column(),
        }
    })
}

#[track_caller]
fn fitsio_error(e: fitsio::errors::Error, fptr: &FitsFile) -> FitsError {
    let caller = std::panic::Location::caller();
    FitsError::Fitsio {
        fits_error: Box::new(e),
        fits_filename: fptr.file_path().to_path_buf().into_boxed_path(),
        hdu_description: "Primary".into(),
        source_file: caller.file(),
        source_line: caller.line(),
        source_column: caller.column(),
    }
}

/// Check if we are able to write to a file path. If we aren't able to write to
/// the file, it's either because the directory containing the file doesn't
/// exist, or there's another issue (probably bad permissions). In the former
/// case, create the parent directories, otherwise return an error.
/// Additionally, if the file exists, emit a warning that it will be
/// overwritten.
///
/// With this approach, we potentially avoid doing a whole run of the pipeline
/// only to be unable to write to a file at the end.
pub(crate) fn can_write_to_file(file: &Path) -> Result<(), FileWriteError> {
    trace!("Testing whether we can write to {}", file.display());

    if file.is_dir() {
        return Err(FileWriteError::FileNotWritable {
            file: file.display().to_string(),
        });
    }
    let exists = can_write_to_file_inner(file)?;
    if exists {
        format!("Will overwrite the existing file '{}'", file.display()).warn();
    }

    Ok(())
}

fn can_write_to_file_inner(file: &Path) -> Result<bool, FileWriteError> {
    let file_exists = file.exists();

    match std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(file)
        .map_err(|e| e.kind())
    {
        // File is writable.
        Ok(_) => {
            // If the file in question didn't already exist, `OpenOptions::new`
            // creates it as part of its work. We don't want to keep the 0-sized
            // file; remove it if it didn't exist before.
            if !file_exists {
                std::fs::remove_file(file).map_err(FileWriteError::IO)?;
            }
        }

        // File doesn't exist. Attempt to make the directories leading up to the
        // file; if this fails, then we can't write the file anyway.
        Err(std::io::ErrorKind::NotFound) => {
            if let Some(p) = file.parent() {
                match std::fs::DirBuilder::new()
                    .recursive(true)
                    .create(p)
                    .map_err(|e| e.kind())
                {
                    Ok(()) => (),
                    Err(std::io::ErrorKind::PermissionDenied) => {
                        return Err(FileWriteError::NewDirectory(p.to_path_buf()))
                    }
                    Err(e) => return Err(FileWriteError::IO(e.into())),
                }
            }
        }

        Err(std::io::ErrorKind::PermissionDenied) => {
            return Err(FileWriteError::FileNotWritable {
                file: file.display().to_string(),
            })
        }

        Err(e) => {
            return Err(FileWriteError::IO(e.into()));
        }
    }

    Ok(file_exists)
}
